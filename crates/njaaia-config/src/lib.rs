// SPDX-FileCopyrightText: 2026 Njaaia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the njaaia chat relay.
//!
//! TOML files in the XDG hierarchy are layered under environment overrides
//! with Figment, checked strictly (`deny_unknown_fields`), validated, and
//! reported through miette diagnostics. The resulting [`NjaaiaConfig`] is
//! immutable and handed to constructors explicitly.
//!
//! # Usage
//!
//! ```no_run
//! use njaaia_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("listening on {}:{}", config.server.host, config.server.port);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{NjaaiaConfig, UpstreamKind};

/// Load configuration from the XDG hierarchy and environment, then validate it.
pub fn load_and_validate() -> Result<NjaaiaConfig, Vec<ConfigError>> {
    finish(loader::load_config())
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<NjaaiaConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content))
}

/// Load configuration from an explicit file (plus environment) and validate it.
pub fn load_and_validate_path(
    path: &std::path::Path,
) -> Result<NjaaiaConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path))
}

#[allow(clippy::result_large_err)]
fn finish(loaded: Result<NjaaiaConfig, figment::Error>) -> Result<NjaaiaConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}
