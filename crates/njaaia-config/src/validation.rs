// SPDX-FileCopyrightText: 2026 Njaaia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::{NjaaiaConfig, ProviderConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &NjaaiaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.app.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "app.name must not be empty".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.app.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.log_level `{}` is not one of: {}",
                config.app.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    validate_provider("openai", &config.openai, &mut errors);
    validate_provider("gemini", &config.gemini, &mut errors);

    let temperature = config.completion.temperature;
    if !(0.0..=2.0).contains(&temperature) {
        errors.push(ConfigError::Validation {
            message: format!("completion.temperature must be between 0 and 2, got {temperature}"),
        });
    }

    if config.completion.tools_max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "completion.tools_max_tokens must be greater than 0".to_string(),
        });
    }

    if config.completion.simple_max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "completion.simple_max_tokens must be greater than 0".to_string(),
        });
    }

    for (key, value) in [
        ("envio.hypersync_url", &config.envio.hypersync_url),
        ("envio.hyperindex_url", &config.envio.hyperindex_url),
        ("envio.ethereum_hypersync_url", &config.envio.ethereum_hypersync_url),
        ("envio.polygon_hypersync_url", &config.envio.polygon_hypersync_url),
        ("envio.arbitrum_hypersync_url", &config.envio.arbitrum_hypersync_url),
    ] {
        if let Some(err) = check_http_url(key, value) {
            errors.push(err);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_provider(section: &str, provider: &ProviderConfig, errors: &mut Vec<ConfigError>) {
    if let Some(err) = check_http_url(&format!("{section}.base_url"), &provider.base_url) {
        errors.push(err);
    }
    if provider.model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: format!("{section}.model must not be empty"),
        });
    }
}

fn check_http_url(key: &str, value: &str) -> Option<ConfigError> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => None,
        Ok(parsed) => Some(ConfigError::Validation {
            message: format!("{key} must use http or https, got scheme `{}`", parsed.scheme()),
        }),
        Err(e) => Some(ConfigError::Validation {
            message: format!("{key} `{value}` is not a valid URL: {e}"),
        }),
    }
}
