// SPDX-FileCopyrightText: 2026 Njaaia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the njaaia chat relay.
//!
//! Holds the error type, the [`ChatProvider`] trait implemented by upstream
//! clients, and the result types that flow from providers to the gateway.

pub mod error;
pub mod provider;
pub mod types;

pub use error::NjaaiaError;
pub use provider::ChatProvider;
pub use types::{
    ChatMode, Completion, FallbackCause, FragmentStream, NOT_CONFIGURED_REPLY, NO_CONTENT_REPLY,
    SIMPLE_FALLBACK_REPLY, TOOLS_FALLBACK_REPLY,
};
