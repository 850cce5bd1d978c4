// SPDX-FileCopyrightText: 2026 Njaaia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway API.
//!
//! Request bodies are taken as raw bytes and validated by hand so that
//! malformed JSON (500) and a bad `message` field (400) produce the exact
//! error shapes clients expect.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{sse::Sse, IntoResponse, Response},
    Json,
};
use njaaia_core::{ChatMode, Completion};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::server::GatewayState;
use crate::sse;

/// Capabilities advertised by `GET /api/chat`.
pub const CAPABILITIES: &[&str] = &[
    "Blockchain data analysis",
    "Token transfer tracking",
    "DeFi protocol insights",
    "Wallet analytics",
    "Real-time on-chain data",
];

const MESSAGE_REQUIRED: &str = "Message is required and must be a string";
const USE_TOOLS_NOT_BOOL: &str = "useTools must be a boolean";

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
    /// Underlying detail (server errors only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Why a request body was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The body is not JSON at all.
    Malformed(String),
    /// A field is missing or has the wrong type.
    Invalid(&'static str),
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        match self {
            RequestError::Malformed(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                    message: Some(detail),
                }),
            )
                .into_response(),
            RequestError::Invalid(reason) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: reason.to_string(),
                    message: None,
                }),
            )
                .into_response(),
        }
    }
}

/// Parses a request body as JSON.
///
/// A literal `null` has no fields to read and counts as malformed.
fn parse_body(body: &[u8]) -> Result<Value, RequestError> {
    let parsed: Value = serde_json::from_slice(body).map_err(|e| {
        error!(error = %e, "malformed request body");
        RequestError::Malformed(e.to_string())
    })?;
    if parsed.is_null() {
        error!("request body is null");
        return Err(RequestError::Malformed("request body is null".to_string()));
    }
    Ok(parsed)
}

/// Extracts the required, non-empty `message` string.
pub fn extract_message(body: &Value) -> Result<String, RequestError> {
    match body.get("message") {
        Some(Value::String(message)) if !message.is_empty() => Ok(message.clone()),
        _ => Err(RequestError::Invalid(MESSAGE_REQUIRED)),
    }
}

/// Extracts the optional `useTools` flag; missing or null means true.
pub fn extract_use_tools(body: &Value) -> Result<bool, RequestError> {
    match body.get("useTools") {
        None | Some(Value::Null) => Ok(true),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(_) => Err(RequestError::Invalid(USE_TOOLS_NOT_BOOL)),
    }
}

/// Relay response payload.
#[derive(Debug, Serialize)]
pub struct RelayData {
    /// Text to display.
    pub response: String,
    /// Always empty; present on successful tools-mode replies.
    #[serde(rename = "intermediateSteps", skip_serializing_if = "Option::is_none")]
    pub intermediate_steps: Option<Vec<Value>>,
    /// Degradation detail on failed tools-mode replies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayData {
    /// Shapes a completion the way each mode reports it.
    pub fn from_completion(completion: Completion, mode: ChatMode) -> Self {
        match (mode, completion) {
            (ChatMode::Tools, Completion::Ok(response)) => Self {
                response,
                intermediate_steps: Some(Vec::new()),
                error: None,
            },
            (ChatMode::Tools, Completion::Fallback { text, cause }) => Self {
                response: text,
                intermediate_steps: None,
                error: Some(cause.detail().to_string()),
            },
            (ChatMode::Simple, completion) => Self {
                response: completion.into_text(),
                intermediate_steps: None,
                error: None,
            },
        }
    }
}

/// Relay success envelope.
#[derive(Debug, Serialize)]
pub struct RelayEnvelope {
    pub success: bool,
    pub data: RelayData,
}

/// Capability listing payload.
#[derive(Debug, Serialize)]
pub struct CapabilitiesResponse {
    pub message: String,
    pub status: &'static str,
    pub capabilities: Vec<&'static str>,
}

/// Health probe payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: String,
}

/// POST /api/chat
///
/// Validates the body, routes the message and returns the completion in a
/// `{ success, data }` envelope.
pub async fn post_chat(State(state): State<GatewayState>, body: Bytes) -> Response {
    let fields = parse_body(&body)
        .and_then(|parsed| Ok((extract_message(&parsed)?, extract_use_tools(&parsed)?)));
    let (message, use_tools) = match fields {
        Ok(fields) => fields,
        Err(e) => return e.into_response(),
    };

    let decision = state.router.route(&message, use_tools);
    info!(
        mode = %decision.mode,
        blockchain_topic = decision.is_specialized(),
        provider = state.provider.name(),
        "relaying chat message"
    );

    let completion = state.provider.complete(&message, decision.mode).await;
    if let Some(cause) = completion.cause() {
        info!(cause = cause.detail(), "chat reply degraded to fallback");
    }

    Json(RelayEnvelope {
        success: true,
        data: RelayData::from_completion(completion, decision.mode),
    })
    .into_response()
}

/// GET /api/chat
///
/// Static capability listing.
pub async fn get_chat(State(state): State<GatewayState>) -> Json<CapabilitiesResponse> {
    Json(CapabilitiesResponse {
        message: format!("{} AI Chat API", state.app_name),
        status: "active",
        capabilities: CAPABILITIES.to_vec(),
    })
}

/// POST /api/chat/stream
///
/// Validates the body, then streams `start`, `chunk`* and `done` events.
pub async fn post_chat_stream(State(state): State<GatewayState>, body: Bytes) -> Response {
    let message = match parse_body(&body).and_then(|parsed| extract_message(&parsed)) {
        Ok(message) => message,
        Err(e) => return e.into_response(),
    };

    info!(provider = state.provider.name(), "opening chat stream");
    let fragments = state.provider.stream(&message);
    Sse::new(sse::chat_events(fragments)).into_response()
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let provider = if state.provider.is_configured() {
        state.provider.name().to_string()
    } else {
        "unconfigured".to_string()
    };
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        provider,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use njaaia_core::FallbackCause;
    use serde_json::json;

    #[test]
    fn message_must_be_non_empty_string() {
        assert_eq!(extract_message(&json!({"message": "hi"})), Ok("hi".to_string()));
        for body in [
            json!({}),
            json!({"message": 123}),
            json!({"message": ""}),
            json!({"message": null}),
            json!({"message": ["hi"]}),
            json!("just a string"),
        ] {
            assert_eq!(
                extract_message(&body),
                Err(RequestError::Invalid(MESSAGE_REQUIRED)),
                "body: {body}"
            );
        }
    }

    #[test]
    fn use_tools_defaults_to_true() {
        assert_eq!(extract_use_tools(&json!({"message": "x"})), Ok(true));
        assert_eq!(extract_use_tools(&json!({"useTools": null})), Ok(true));
        assert_eq!(extract_use_tools(&json!({"useTools": false})), Ok(false));
        assert_eq!(
            extract_use_tools(&json!({"useTools": "no"})),
            Err(RequestError::Invalid(USE_TOOLS_NOT_BOOL))
        );
    }

    #[test]
    fn malformed_body_is_reported() {
        assert!(matches!(parse_body(b"{not json"), Err(RequestError::Malformed(_))));
        assert!(matches!(parse_body(b"null"), Err(RequestError::Malformed(_))));
        assert!(matches!(parse_body(b" null "), Err(RequestError::Malformed(_))));
        assert!(parse_body(br#"{"message":"ok"}"#).is_ok());
    }

    #[test]
    fn tools_ok_carries_empty_steps() {
        let data = RelayData::from_completion(Completion::Ok("yes".into()), ChatMode::Tools);
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({"response": "yes", "intermediateSteps": []})
        );
    }

    #[test]
    fn tools_fallback_carries_error() {
        let completion = Completion::fallback("sorry", FallbackCause::NotConfigured);
        let data = RelayData::from_completion(completion, ChatMode::Tools);
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({"response": "sorry", "error": "Configuration error"})
        );
    }

    #[test]
    fn simple_mode_carries_response_only() {
        let cause = FallbackCause::Upstream("OpenAI API error: 500".into());
        let completion = Completion::fallback("sorry", cause);
        let data = RelayData::from_completion(completion, ChatMode::Simple);
        assert_eq!(serde_json::to_value(&data).unwrap(), json!({"response": "sorry"}));
    }
}
