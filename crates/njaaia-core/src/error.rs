// SPDX-FileCopyrightText: 2026 Njaaia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the njaaia chat relay.

use thiserror::Error;

/// The primary error type shared by the relay crates.
#[derive(Debug, Error)]
pub enum NjaaiaError {
    /// Configuration errors (invalid values, unusable credentials).
    #[error("configuration error: {0}")]
    Config(String),

    /// Upstream chat-completion errors (transport failure, bad status, bad body).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// HTTP server errors (bind failure, serve loop failure).
    #[error("server error: {message}")]
    Server {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl NjaaiaError {
    /// Shorthand for a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        NjaaiaError::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// The error message without its kind prefix.
    pub fn detail(&self) -> &str {
        match self {
            NjaaiaError::Config(message) | NjaaiaError::Internal(message) => message,
            NjaaiaError::Provider { message, .. } | NjaaiaError::Server { message, .. } => message,
        }
    }
}
