// SPDX-FileCopyrightText: 2026 Njaaia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::future::Future;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use njaaia_core::{ChatProvider, NjaaiaError};
use njaaia_router::ModeRouter;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Shared state for axum request handlers.
///
/// Everything here is immutable after construction; requests share no
/// mutable state.
#[derive(Clone)]
pub struct GatewayState {
    /// Upstream chat provider used by both relay and stream endpoints.
    pub provider: Arc<dyn ChatProvider>,
    /// Picks tools or simple mode per message.
    pub router: ModeRouter,
    /// Display name used in the capability listing.
    pub app_name: Arc<str>,
}

impl GatewayState {
    pub fn new(provider: Arc<dyn ChatProvider>, app_name: &str) -> Self {
        Self {
            provider,
            router: ModeRouter::new(),
            app_name: Arc::from(app_name),
        }
    }
}

/// Gateway listener configuration (mirrors `[server]` from njaaia-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Builds the application router with all routes and middleware.
///
/// Routes:
/// - POST /api/chat
/// - GET /api/chat
/// - POST /api/chat/stream
/// - GET /health
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/api/chat", post(handlers::post_chat).get(handlers::get_chat))
        .route("/api/chat/stream", post(handlers::post_chat_stream))
        .route("/health", get(handlers::get_health))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// Start the gateway HTTP server and run until `shutdown` resolves.
pub async fn start_server<F>(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: F,
) -> Result<(), NjaaiaError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| NjaaiaError::Server {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| NjaaiaError::Server {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("Gateway server stopped");
    Ok(())
}
