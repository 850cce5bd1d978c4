// SPDX-FileCopyrightText: 2026 Njaaia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `njaaia serve` command implementation.
//!
//! Builds the chat provider from configuration and runs the HTTP gateway
//! until SIGINT or SIGTERM.

use std::sync::Arc;

use njaaia_config::NjaaiaConfig;
use njaaia_core::{ChatProvider, NjaaiaError};
use njaaia_gateway::{start_server, GatewayState, ServerConfig};
use njaaia_openai::OpenAiProvider;
use tracing::{info, warn};

/// Runs the relay server until a shutdown signal arrives.
pub async fn run_serve(config: NjaaiaConfig) -> Result<(), NjaaiaError> {
    let provider: Arc<dyn ChatProvider> = Arc::new(OpenAiProvider::from_config(&config)?);
    info!(
        app = config.app.name,
        provider = provider.name(),
        configured = provider.is_configured(),
        "starting njaaia relay"
    );

    let state = GatewayState::new(provider, &config.app.name);
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    start_server(&server_config, state, shutdown_signal()).await?;

    info!("njaaia serve shutdown complete");
    Ok(())
}

/// Resolves on SIGINT (Ctrl+C) or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
        _ = terminate => info!("received SIGTERM, initiating shutdown"),
    }
}

/// Initialize the tracing subscriber with an env filter.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies to the
/// njaaia crates and everything else logs at `warn`. Output goes to stderr so
/// `njaaia ask` and `njaaia config` keep stdout clean.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Filter directive used when `RUST_LOG` is unset.
fn default_filter(log_level: &str) -> String {
    format!("njaaia={log_level},warn")
}
