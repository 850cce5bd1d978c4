// SPDX-FileCopyrightText: 2026 Njaaia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible Chat Completions APIs.
//!
//! Provides [`OpenAiClient`], which handles bearer authentication, request
//! construction and status handling. One request per call: no retries, and
//! no timeout beyond reqwest's defaults.

use njaaia_core::NjaaiaError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse};

/// HTTP client for one OpenAI-compatible upstream.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OpenAiClient {
    /// Creates a client for `{base_url}/chat/completions`.
    ///
    /// # Arguments
    /// * `api_key` - Bearer token sent with every request
    /// * `base_url` - API root, e.g. "https://api.openai.com/v1"
    /// * `model` - Model identifier placed in every request
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Result<Self, NjaaiaError> {
        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
            NjaaiaError::Config(format!("invalid API key header value: {e}"))
        })?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| NjaaiaError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.to_string(),
        })
    }

    /// Returns the model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the full chat-completions URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends a non-streaming request and returns the decoded response.
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, NjaaiaError> {
        let response = self.send(request).await?;

        let body = response.text().await.map_err(|e| NjaaiaError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        serde_json::from_str(&body).map_err(|e| NjaaiaError::Provider {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Sends a streaming request and returns the open response.
    ///
    /// The caller reads the event stream from the body. Transport errors and
    /// non-2xx statuses are reported here, before any body is consumed.
    pub async fn open_stream(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<reqwest::Response, NjaaiaError> {
        let mut req = request.clone();
        req.stream = true;
        self.send(&req).await
    }

    async fn send(&self, request: &ChatCompletionRequest) -> Result<reqwest::Response, NjaaiaError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| NjaaiaError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, stream = request.stream, "chat completion response received");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if let Some(reason) = upstream_reason(&body) {
            warn!(status = status.as_u16(), reason = %reason, "upstream rejected chat completion");
        }
        Err(NjaaiaError::provider(error_message(status)))
    }
}

/// Failure detail for a non-2xx response, as clients see it.
fn error_message(status: StatusCode) -> String {
    format!("OpenAI API error: {}", status.as_u16())
}

/// Upstream explanation from an error body, for the log only.
fn upstream_reason(body: &str) -> Option<String> {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_err) => Some(api_err.error.message),
        Err(_) if body.trim().is_empty() => None,
        Err(_) => Some(body.trim().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> OpenAiClient {
        OpenAiClient::new("test-api-key", base_url, "gpt-4").unwrap()
    }

    fn test_request() -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: "gpt-4".into(),
            messages: vec![ChatMessage::user("Hello")],
            temperature: 0.1,
            max_tokens: 500,
            stream: false,
        }
    }

    #[test]
    fn endpoint_joins_base_url() {
        let client = test_client("https://api.openai.com/v1/");
        assert_eq!(client.endpoint(), "https://api.openai.com/v1/chat/completions");
        assert_eq!(client.model(), "gpt-4");
    }

    #[test]
    fn error_message_names_status_only() {
        assert_eq!(error_message(StatusCode::TOO_MANY_REQUESTS), "OpenAI API error: 429");
        assert_eq!(error_message(StatusCode::BAD_GATEWAY), "OpenAI API error: 502");
    }

    #[test]
    fn upstream_reason_reads_error_body() {
        let body = r#"{"error":{"message":"Rate limit reached","type":"requests"}}"#;
        assert_eq!(upstream_reason(body).as_deref(), Some("Rate limit reached"));
        assert_eq!(upstream_reason(" upstream down\n").as_deref(), Some("upstream down"));
        assert_eq!(upstream_reason("  "), None);
    }

    #[tokio::test]
    async fn chat_completion_success() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Hi there!"},
                "finish_reason": "stop"
            }]
        });

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.chat_completion(&test_request()).await.unwrap();
        assert_eq!(result.first_content(), Some("Hi there!"));
    }

    #[tokio::test]
    async fn chat_completion_fails_on_401_without_retry() {
        let server = MockServer::start().await;

        let error_body = serde_json::json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
        });

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(&error_body))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.chat_completion(&test_request()).await.unwrap_err();
        assert_eq!(err.to_string(), "provider error: OpenAI API error: 401");
    }

    #[tokio::test]
    async fn chat_completion_fails_on_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.chat_completion(&test_request()).await.unwrap_err();
        assert!(err.to_string().contains("failed to parse"), "got: {err}");
    }

    #[tokio::test]
    async fn client_sends_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-api-key"))
            .and(header("content-type", "application/json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.chat_completion(&test_request()).await;
        assert!(result.is_ok(), "headers should match: {result:?}");
    }

    #[tokio::test]
    async fn open_stream_forces_stream_flag() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string("data: [DONE]\n\n"),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let response = client.open_stream(&test_request()).await.unwrap();
        assert!(response.status().is_success());

        let received = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
        assert_eq!(body["stream"], true);
    }

    #[tokio::test]
    async fn open_stream_reports_bad_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.open_stream(&test_request()).await.unwrap_err();
        assert_eq!(err.to_string(), "provider error: OpenAI API error: 500");
    }

    #[tokio::test]
    async fn transport_failure_is_provider_error() {
        // Nothing listens on port 9; the connect fails.
        let client = test_client("http://127.0.0.1:9");
        let err = client.chat_completion(&test_request()).await.unwrap_err();
        assert!(err.to_string().contains("HTTP request failed"), "got: {err}");
    }
}
