// SPDX-FileCopyrightText: 2026 Njaaia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! njaaia - Not Just Another AI Assistant.
//!
//! This is the binary entry point for the njaaia chat relay.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod ask;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// njaaia - a blockchain-aware AI chat relay.
#[derive(Parser, Debug)]
#[command(name = "njaaia", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP relay server.
    Serve,
    /// Send one message through the relay pipeline and print the reply.
    Ask {
        /// The message to send.
        message: String,
        /// Stream the reply fragment by fragment.
        #[arg(long)]
        stream: bool,
        /// Never use the blockchain-aware mode.
        #[arg(long)]
        no_tools: bool,
    },
    /// Print the effective configuration with API keys redacted.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => njaaia_config::load_and_validate_path(path),
        None => njaaia_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            njaaia_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => {
            serve::init_tracing(&config.app.log_level);
            serve::run_serve(config).await
        }
        Some(Commands::Ask {
            message,
            stream,
            no_tools,
        }) => {
            serve::init_tracing(&config.app.log_level);
            ask::run_ask(&config, &message, stream, !no_tools).await
        }
        Some(Commands::Config) => match config.redacted().to_toml() {
            Ok(rendered) => {
                print!("{rendered}");
                Ok(())
            }
            Err(e) => Err(njaaia_core::NjaaiaError::Internal(format!(
                "failed to render configuration: {e}"
            ))),
        },
        None => {
            println!("njaaia: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
