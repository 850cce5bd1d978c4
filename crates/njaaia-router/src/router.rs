// SPDX-FileCopyrightText: 2026 Njaaia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat mode selection for the relay endpoint.
//!
//! Tools mode needs both the caller's opt-in and a blockchain topic. Every
//! other combination falls back to the plain, prompt-free simple mode.

use njaaia_core::ChatMode;
use tracing::debug;

use crate::classifier::TopicClassifier;

/// Outcome of routing a single message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
    /// Mode the completion client should use.
    pub mode: ChatMode,
    /// First blockchain keyword found in the message, if any.
    pub matched_keyword: Option<&'static str>,
    /// Human-readable reason for the decision.
    pub reason: String,
}

impl RoutingDecision {
    /// True when the message mentioned a blockchain topic.
    pub fn is_specialized(&self) -> bool {
        self.matched_keyword.is_some()
    }
}

/// Maps an incoming message and the caller's flag onto a [`ChatMode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeRouter {
    classifier: TopicClassifier,
}

impl ModeRouter {
    pub fn new() -> Self {
        Self {
            classifier: TopicClassifier::new(),
        }
    }

    /// Route a message.
    pub fn route(&self, message: &str, use_tools: bool) -> RoutingDecision {
        let matched_keyword = self.classifier.matched_keyword(message);
        let mode = if use_tools && matched_keyword.is_some() {
            ChatMode::Tools
        } else {
            ChatMode::Simple
        };

        let reason = match (use_tools, matched_keyword) {
            (true, Some(keyword)) => format!("blockchain topic (keyword '{keyword}')"),
            (true, None) => "general topic".to_string(),
            (false, Some(keyword)) => {
                format!("tools disabled by caller (keyword '{keyword}' ignored)")
            }
            (false, None) => "tools disabled by caller".to_string(),
        };

        debug!(
            mode = %mode,
            specialized = matched_keyword.is_some(),
            reason = %reason,
            "routing decision"
        );

        RoutingDecision {
            mode,
            matched_keyword,
            reason,
        }
    }
}
