// SPDX-FileCopyrightText: 2026 Njaaia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types passed between the router, providers, and the gateway.

use std::pin::Pin;

use futures_core::Stream;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::NjaaiaError;

/// Reply used whenever no upstream credential is configured.
pub const NOT_CONFIGURED_REPLY: &str = "I'm sorry, but I'm not properly configured yet. Please check that the OpenAI API key is set up correctly.";

/// Reply substituted when the upstream answers without any content.
pub const NO_CONTENT_REPLY: &str = "Sorry, I could not generate a response.";

/// Fallback for failed tool-aware completions.
pub const TOOLS_FALLBACK_REPLY: &str = "I encountered an error while processing your request. Please try again or rephrase your question.";

/// Fallback for failed simple completions and failed streams.
pub const SIMPLE_FALLBACK_REPLY: &str =
    "I encountered an error while processing your request. Please try again.";

/// How a single message is sent upstream.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Blockchain-aware: system instruction plus the larger token ceiling.
    Tools,
    /// Plain question: user message only, smaller token ceiling.
    Simple,
}

impl ChatMode {
    /// Fallback text shown when a completion in this mode fails upstream.
    pub fn fallback_reply(self) -> &'static str {
        match self {
            ChatMode::Tools => TOOLS_FALLBACK_REPLY,
            ChatMode::Simple => SIMPLE_FALLBACK_REPLY,
        }
    }
}

/// Why a completion degraded to fallback text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackCause {
    /// No upstream credential is configured; no request was made.
    NotConfigured,
    /// The upstream call failed; carries the error detail.
    Upstream(String),
}

impl FallbackCause {
    /// Short detail suitable for the `error` field of a response envelope.
    pub fn detail(&self) -> &str {
        match self {
            FallbackCause::NotConfigured => "Configuration error",
            FallbackCause::Upstream(detail) => detail,
        }
    }
}

/// Outcome of a non-streaming completion.
///
/// Every variant carries displayable text, so callers never have to handle
/// a failure path separately. `Fallback` lets them detect a degraded reply
/// without inspecting the string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The upstream produced an answer.
    Ok(String),
    /// A canned reply stood in for the upstream answer.
    Fallback { text: String, cause: FallbackCause },
}

impl Completion {
    /// Builds a fallback completion from static reply text.
    pub fn fallback(text: &str, cause: FallbackCause) -> Self {
        Completion::Fallback {
            text: text.to_string(),
            cause,
        }
    }

    /// Text to display, regardless of outcome.
    pub fn text(&self) -> &str {
        match self {
            Completion::Ok(text) => text,
            Completion::Fallback { text, .. } => text,
        }
    }

    /// The degradation cause, if any.
    pub fn cause(&self) -> Option<&FallbackCause> {
        match self {
            Completion::Ok(_) => None,
            Completion::Fallback { cause, .. } => Some(cause),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Completion::Fallback { .. })
    }

    /// Consumes the completion, returning its display text.
    pub fn into_text(self) -> String {
        match self {
            Completion::Ok(text) => text,
            Completion::Fallback { text, .. } => text,
        }
    }
}

/// Ordered, finite, single-use sequence of streamed text fragments.
///
/// An `Err` item means the stream broke after it had started; nothing
/// follows it.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, NjaaiaError>> + Send>>;
