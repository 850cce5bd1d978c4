// SPDX-FileCopyrightText: 2026 Njaaia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `njaaia ask` command implementation.
//!
//! Runs one message through the same router and provider the server uses
//! and prints the reply to stdout.

use std::io::Write;

use futures::StreamExt;
use njaaia_config::NjaaiaConfig;
use njaaia_core::{ChatProvider, NjaaiaError};
use njaaia_openai::OpenAiProvider;
use njaaia_router::ModeRouter;
use tracing::{debug, warn};

/// Sends `message` upstream and prints the answer.
pub async fn run_ask(
    config: &NjaaiaConfig,
    message: &str,
    stream: bool,
    use_tools: bool,
) -> Result<(), NjaaiaError> {
    let provider = OpenAiProvider::from_config(config)?;

    if stream {
        return print_stream(&provider, message).await;
    }

    let decision = ModeRouter::new().route(message, use_tools);
    debug!(
        mode = %decision.mode,
        blockchain_topic = decision.is_specialized(),
        reason = %decision.reason,
        "ask routed"
    );

    let completion = provider.complete(message, decision.mode).await;
    if let Some(cause) = completion.cause() {
        warn!(cause = cause.detail(), "reply degraded to fallback");
    }
    println!("{}", completion.text());
    Ok(())
}

async fn print_stream(provider: &dyn ChatProvider, message: &str) -> Result<(), NjaaiaError> {
    let mut fragments = provider.stream(message);
    let mut stdout = std::io::stdout();

    while let Some(fragment) = fragments.next().await {
        let text = fragment?;
        stdout
            .write_all(text.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|e| NjaaiaError::Internal(format!("failed to write to stdout: {e}")))?;
    }
    println!();
    Ok(())
}
