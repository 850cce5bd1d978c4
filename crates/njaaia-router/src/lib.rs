// SPDX-FileCopyrightText: 2026 Njaaia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Topic classification and chat mode routing for njaaia.
//!
//! This crate provides:
//! - [`TopicClassifier`]: keyword check for blockchain-related messages
//! - [`ModeRouter`]: picks tools or simple mode for the completion client

pub mod classifier;
pub mod router;

pub use classifier::{TopicClassifier, BLOCKCHAIN_KEYWORDS};
pub use router::{ModeRouter, RoutingDecision};
