// SPDX-FileCopyrightText: 2026 Njaaia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for njaaia integration tests.
//!
//! Provides a scripted chat provider for fast, deterministic tests of the
//! gateway without any upstream API.
//!
//! # Components
//!
//! - [`MockProvider`] - Chat provider with queued completions and a fixed
//!   fragment script for streams

pub mod mock_provider;

pub use mock_provider::{MockProvider, ScriptedFragment};
