// SPDX-FileCopyrightText: 2026 Njaaia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider trait for chat-completion backends.

use async_trait::async_trait;

use crate::types::{ChatMode, Completion, FragmentStream};

/// A chat-completion backend the relay forwards messages to.
///
/// Implementations never fail outright: upstream and configuration problems
/// are folded into [`Completion::Fallback`] or a fallback fragment, so the
/// gateway can always show the caller something.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name for logs and the health probe ("openai", "gemini", ...).
    fn name(&self) -> &str;

    /// Whether an upstream credential is available.
    fn is_configured(&self) -> bool;

    /// Sends one message and waits for the full reply.
    async fn complete(&self, message: &str, mode: ChatMode) -> Completion;

    /// Opens a streaming reply. No I/O happens until the stream is polled.
    fn stream(&self, message: &str) -> FragmentStream;
}
