// SPDX-FileCopyrightText: 2026 Njaaia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible chat provider for njaaia.
//!
//! This crate implements [`ChatProvider`] for any upstream that speaks the
//! Chat Completions protocol. The same code serves OpenAI and Gemini (through
//! its OpenAI-compatible endpoint); configuration decides which one is used.

pub mod client;
pub mod sse;
pub mod types;

use async_trait::async_trait;
use futures::future;
use futures::stream::{self, StreamExt};
use njaaia_config::model::CompletionConfig;
use njaaia_config::NjaaiaConfig;
use njaaia_core::{
    ChatMode, ChatProvider, Completion, FallbackCause, FragmentStream, NjaaiaError,
    NOT_CONFIGURED_REPLY, NO_CONTENT_REPLY, SIMPLE_FALLBACK_REPLY,
};
use tracing::{debug, error, info, warn};

use crate::client::OpenAiClient;
use crate::types::{ChatCompletionRequest, ChatMessage};

/// Built-in system instruction for blockchain-aware requests.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are njaaia, a sophisticated AI assistant specialized in blockchain and Web3 data analysis.

Your capabilities include:
- Analyzing blockchain data and transactions
- Explaining DeFi protocols and concepts
- Providing insights about Web3 ecosystems
- Answering questions about cryptocurrency and blockchain technology

Be conversational, helpful, and focus on making complex blockchain concepts accessible to everyone.
If you don't have specific real-time data, explain what you can help with instead.";

/// Provider name reported when no credential is configured.
pub const UNCONFIGURED: &str = "unconfigured";

/// Chat provider backed by an OpenAI-compatible HTTP API.
///
/// With no credential the provider still constructs; every call then returns
/// the not-configured reply without touching the network.
pub struct OpenAiProvider {
    client: Option<OpenAiClient>,
    name: &'static str,
    completion: CompletionConfig,
}

impl OpenAiProvider {
    /// Creates the provider from the resolved configuration.
    ///
    /// # Upstream Resolution
    /// 1. `[gemini]` if its API key is set
    /// 2. `[openai]` if its API key is set
    /// 3. Unconfigured (warning logged, fallback replies)
    pub fn from_config(config: &NjaaiaConfig) -> Result<Self, NjaaiaError> {
        let (client, name) = match config.upstream() {
            Some((kind, upstream)) => {
                let api_key = upstream.api_key.as_deref().unwrap_or_default();
                let client = OpenAiClient::new(api_key, &upstream.base_url, &upstream.model)?;
                info!(
                    provider = kind.as_str(),
                    model = upstream.model,
                    endpoint = client.endpoint(),
                    "chat provider initialized"
                );
                (Some(client), kind.as_str())
            }
            None => {
                warn!(
                    "no OPENAI_API_KEY or GEMINI_API_KEY configured; replies will use the not-configured fallback"
                );
                (None, UNCONFIGURED)
            }
        };

        Ok(Self {
            client,
            name,
            completion: config.completion.clone(),
        })
    }

    fn system_prompt(&self) -> &str {
        self.completion
            .system_prompt
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }

    /// Assembles a fresh request for one message.
    fn build_request(
        &self,
        model: &str,
        message: &str,
        mode: ChatMode,
        stream: bool,
    ) -> ChatCompletionRequest {
        let (messages, max_tokens) = match mode {
            ChatMode::Tools => (
                vec![
                    ChatMessage::system(self.system_prompt()),
                    ChatMessage::user(message),
                ],
                self.completion.tools_max_tokens,
            ),
            ChatMode::Simple => (
                vec![ChatMessage::user(message)],
                self.completion.simple_max_tokens,
            ),
        };

        ChatCompletionRequest {
            model: model.to_string(),
            messages,
            temperature: self.completion.temperature,
            max_tokens,
            stream,
        }
    }
}

/// A stream holding exactly one fragment.
fn single_fragment(text: &str) -> FragmentStream {
    Box::pin(stream::once(future::ready(Ok(text.to_string()))))
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    async fn complete(&self, message: &str, mode: ChatMode) -> Completion {
        let Some(client) = &self.client else {
            return Completion::fallback(NOT_CONFIGURED_REPLY, FallbackCause::NotConfigured);
        };

        let request = self.build_request(client.model(), message, mode, false);
        match client.chat_completion(&request).await {
            Ok(response) => match response.first_content() {
                Some(text) => Completion::Ok(text.to_string()),
                None => {
                    debug!(provider = self.name, "upstream returned no content");
                    Completion::Ok(NO_CONTENT_REPLY.to_string())
                }
            },
            Err(e) => {
                error!(provider = self.name, mode = %mode, error = %e, "chat completion failed");
                let cause = FallbackCause::Upstream(e.detail().to_string());
                Completion::fallback(mode.fallback_reply(), cause)
            }
        }
    }

    fn stream(&self, message: &str) -> FragmentStream {
        let Some(client) = self.client.clone() else {
            return single_fragment(NOT_CONFIGURED_REPLY);
        };

        let request = self.build_request(client.model(), message, ChatMode::Tools, true);
        let provider = self.name;

        let opened = stream::once(async move { client.open_stream(&request).await });
        Box::pin(opened.flat_map(move |result| -> FragmentStream {
            match result {
                Ok(response) => sse::fragments(response.bytes_stream()),
                Err(e) => {
                    error!(provider, error = %e, "streaming request failed");
                    single_fragment(SIMPLE_FALLBACK_REPLY)
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use njaaia_core::TOOLS_FALLBACK_REPLY;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> NjaaiaConfig {
        let mut config = NjaaiaConfig::default();
        config.openai.api_key = Some("sk-test".into());
        config.openai.base_url = server.uri();
        config
    }

    fn completion_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": text}}]
        })
    }

    async fn last_request_body(server: &MockServer) -> serde_json::Value {
        let received = server.received_requests().await.unwrap();
        let last = received.last().expect("at least one request");
        serde_json::from_slice(&last.body).unwrap()
    }

    #[test]
    fn unconfigured_provider_reports_name() {
        let provider = OpenAiProvider::from_config(&NjaaiaConfig::default()).unwrap();
        assert_eq!(provider.name(), UNCONFIGURED);
        assert!(!provider.is_configured());
    }

    #[test]
    fn gemini_key_selects_gemini() {
        let mut config = NjaaiaConfig::default();
        config.openai.api_key = Some("sk-openai".into());
        config.gemini.api_key = Some("gm-key".into());
        let provider = OpenAiProvider::from_config(&config).unwrap();
        assert_eq!(provider.name(), "gemini");
        assert!(provider.is_configured());
    }

    #[test]
    fn system_prompt_override_is_used() {
        let mut config = NjaaiaConfig::default();
        config.completion.system_prompt = Some("Answer in haiku.".into());
        let provider = OpenAiProvider::from_config(&config).unwrap();
        let req = provider.build_request("gpt-4", "hi", ChatMode::Tools, false);
        assert_eq!(req.messages[0], ChatMessage::system("Answer in haiku."));
    }

    /// A keyless config whose upstream URLs point at `server`.
    async fn keyless_config_for(server: &MockServer) -> NjaaiaConfig {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("leaked")))
            .expect(0)
            .mount(server)
            .await;
        let mut config = NjaaiaConfig::default();
        config.openai.base_url = server.uri();
        config.gemini.base_url = server.uri();
        config
    }

    #[tokio::test]
    async fn unconfigured_complete_returns_apology_without_network() {
        let server = MockServer::start().await;
        let provider = OpenAiProvider::from_config(&keyless_config_for(&server).await).unwrap();

        for mode in [ChatMode::Tools, ChatMode::Simple] {
            let completion = provider.complete("hello", mode).await;
            assert_eq!(completion.text(), NOT_CONFIGURED_REPLY);
            assert_eq!(completion.cause(), Some(&FallbackCause::NotConfigured));
        }
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unconfigured_stream_yields_single_apology_without_network() {
        let server = MockServer::start().await;
        let provider = OpenAiProvider::from_config(&keyless_config_for(&server).await).unwrap();

        let fragments: Vec<_> = provider.stream("hello").collect().await;
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].as_ref().unwrap(), NOT_CONFIGURED_REPLY);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn tools_mode_sends_system_prompt_and_large_ceiling() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("On-chain!")))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenAiProvider::from_config(&config_for(&server)).unwrap();
        let completion = provider.complete("wallet balance?", ChatMode::Tools).await;
        assert_eq!(completion, Completion::Ok("On-chain!".into()));

        let body = last_request_body(&server).await;
        assert_eq!(body["model"], "gpt-4");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], DEFAULT_SYSTEM_PROMPT);
        assert_eq!(body["messages"][1]["content"], "wallet balance?");
        assert!((body["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
        assert!(body.get("stream").is_none());
    }

    #[tokio::test]
    async fn simple_mode_sends_user_message_only() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Sunny.")))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::from_config(&config_for(&server)).unwrap();
        let completion = provider.complete("weather?", ChatMode::Simple).await;
        assert_eq!(completion.text(), "Sunny.");

        let body = last_request_body(&server).await;
        assert_eq!(body["max_tokens"], 500);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
    }

    #[tokio::test]
    async fn empty_content_uses_no_content_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::from_config(&config_for(&server)).unwrap();
        let completion = provider.complete("hi", ChatMode::Simple).await;
        assert_eq!(completion, Completion::Ok(NO_CONTENT_REPLY.into()));
    }

    #[tokio::test]
    async fn body_without_choices_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"unexpected": true})),
            )
            .mount(&server)
            .await;

        let provider = OpenAiProvider::from_config(&config_for(&server)).unwrap();
        let completion = provider.complete("wallet", ChatMode::Tools).await;
        assert_eq!(completion.text(), TOOLS_FALLBACK_REPLY);
        match completion.cause() {
            Some(FallbackCause::Upstream(detail)) => {
                assert!(detail.contains("failed to parse API response"), "got: {detail}");
            }
            other => panic!("expected an upstream cause, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn upstream_error_falls_back_per_mode() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::from_config(&config_for(&server)).unwrap();

        let tools = provider.complete("token swap", ChatMode::Tools).await;
        assert_eq!(tools.text(), TOOLS_FALLBACK_REPLY);
        assert_eq!(
            tools.cause(),
            Some(&FallbackCause::Upstream("OpenAI API error: 500".into()))
        );

        let simple = provider.complete("hello", ChatMode::Simple).await;
        assert_eq!(simple.text(), SIMPLE_FALLBACK_REPLY);
        assert!(simple.is_fallback());
    }

    #[tokio::test]
    async fn stream_yields_deltas() {
        let server = MockServer::start().await;
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"Gas \"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"fees\"}}]}\n\n",
            "data: [DONE]\n\n",
        );
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(body),
            )
            .mount(&server)
            .await;

        let provider = OpenAiProvider::from_config(&config_for(&server)).unwrap();
        let fragments: Vec<String> = provider
            .stream("gas?")
            .map(|item| item.unwrap())
            .collect()
            .await;
        assert_eq!(fragments, vec!["Gas ".to_string(), "fees".to_string()]);

        let sent = last_request_body(&server).await;
        assert_eq!(sent["stream"], true);
        assert_eq!(sent["max_tokens"], 1000);
        assert_eq!(sent["messages"][0]["role"], "system");
    }

    #[tokio::test]
    async fn stream_bad_status_yields_single_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::from_config(&config_for(&server)).unwrap();
        let fragments: Vec<_> = provider.stream("hi").collect().await;
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].as_ref().unwrap(), SIMPLE_FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn stream_is_lazy() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("data: [DONE]\n\n"))
            .expect(0)
            .mount(&server)
            .await;

        let provider = OpenAiProvider::from_config(&config_for(&server)).unwrap();
        let stream = provider.stream("never polled");
        drop(stream);
    }
}
