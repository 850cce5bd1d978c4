// SPDX-FileCopyrightText: 2026 Njaaia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat provider for deterministic testing.
//!
//! `MockProvider` implements `ChatProvider` with queued completions and a
//! fragment script, so gateway tests run without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream;
use tokio::sync::Mutex;

use njaaia_core::{ChatMode, ChatProvider, Completion, FragmentStream, NjaaiaError};

/// One scripted item of a mock stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedFragment {
    /// A text fragment.
    Text(String),
    /// A mid-stream failure with the given detail.
    Error(String),
}

/// A mock chat provider.
///
/// Completions are popped from a FIFO queue; when the queue is empty,
/// `Completion::Ok("mock response")` is returned. Every stream replays the
/// same fragment script. Each `complete` call is recorded with its mode.
pub struct MockProvider {
    completions: Arc<Mutex<VecDeque<Completion>>>,
    script: Vec<ScriptedFragment>,
    calls: Arc<Mutex<Vec<(String, ChatMode)>>>,
    configured: bool,
}

impl MockProvider {
    /// Create a new mock provider with an empty queue and an empty script.
    pub fn new() -> Self {
        Self {
            completions: Arc::new(Mutex::new(VecDeque::new())),
            script: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            configured: true,
        }
    }

    /// Create a mock provider pre-loaded with the given completions.
    pub fn with_completions(completions: Vec<Completion>) -> Self {
        Self {
            completions: Arc::new(Mutex::new(VecDeque::from(completions))),
            ..Self::new()
        }
    }

    /// Replace the fragment script replayed by every stream.
    pub fn with_script(mut self, script: Vec<ScriptedFragment>) -> Self {
        self.script = script;
        self
    }

    /// Convenience: a script of plain text fragments.
    pub fn with_fragments(self, fragments: &[&str]) -> Self {
        self.with_script(
            fragments
                .iter()
                .map(|text| ScriptedFragment::Text((*text).to_string()))
                .collect(),
        )
    }

    /// Report the provider as unconfigured.
    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    /// Messages and modes passed to `complete`, in call order.
    pub async fn recorded_calls(&self) -> Vec<(String, ChatMode)> {
        self.calls.lock().await.clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn complete(&self, message: &str, mode: ChatMode) -> Completion {
        self.calls.lock().await.push((message.to_string(), mode));
        self.completions
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Completion::Ok("mock response".to_string()))
    }

    fn stream(&self, _message: &str) -> FragmentStream {
        let items: Vec<Result<String, NjaaiaError>> = self
            .script
            .iter()
            .map(|fragment| match fragment {
                ScriptedFragment::Text(text) => Ok(text.clone()),
                ScriptedFragment::Error(detail) => Err(NjaaiaError::provider(detail.clone())),
            })
            .collect();
        Box::pin(stream::iter(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use njaaia_core::FallbackCause;

    #[tokio::test]
    async fn completions_pop_in_order_then_default() {
        let provider = MockProvider::with_completions(vec![
            Completion::Ok("first".into()),
            Completion::fallback("sorry", FallbackCause::Upstream("boom".into())),
        ]);

        assert_eq!(provider.complete("a", ChatMode::Tools).await.text(), "first");
        assert!(provider.complete("b", ChatMode::Simple).await.is_fallback());
        assert_eq!(
            provider.complete("c", ChatMode::Simple).await,
            Completion::Ok("mock response".into())
        );

        let calls = provider.recorded_calls().await;
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], ("a".to_string(), ChatMode::Tools));
    }

    #[tokio::test]
    async fn stream_replays_script_with_error() {
        let provider = MockProvider::new().with_script(vec![
            ScriptedFragment::Text("one".into()),
            ScriptedFragment::Error("reset".into()),
        ]);

        let items: Vec<_> = provider.stream("x").collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "one");
        assert!(items[1].is_err());

        // A second stream starts from the top again.
        let again: Vec<_> = provider.stream("y").collect().await;
        assert_eq!(again.len(), 2);
    }

    #[test]
    fn unconfigured_flag() {
        assert!(MockProvider::default().is_configured());
        assert!(!MockProvider::new().unconfigured().is_configured());
    }
}
