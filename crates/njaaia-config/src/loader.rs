// SPDX-FileCopyrightText: 2026 Njaaia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./njaaia.toml` > `~/.config/njaaia/njaaia.toml` > `/etc/njaaia/njaaia.toml`,
//! then the bare credential variables (`OPENAI_API_KEY`, ...), then `NJAAIA_*` overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::NjaaiaConfig;

/// Unprefixed variables read for compatibility with existing deployments.
const BARE_ENV_KEYS: &[(&str, &str)] = &[
    ("openai_api_key", "openai.api_key"),
    ("gemini_api_key", "gemini.api_key"),
    ("envio_hypersync_url", "envio.hypersync_url"),
    ("envio_hyperindex_url", "envio.hyperindex_url"),
    ("ethereum_hypersync_url", "envio.ethereum_hypersync_url"),
    ("polygon_hypersync_url", "envio.polygon_hypersync_url"),
    ("arbitrum_hypersync_url", "envio.arbitrum_hypersync_url"),
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/njaaia/njaaia.toml`
/// 3. `~/.config/njaaia/njaaia.toml`
/// 4. `./njaaia.toml`
/// 5. Bare variables such as `OPENAI_API_KEY`
/// 6. `NJAAIA_*` environment variables
pub fn load_config() -> Result<NjaaiaConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no environment).
pub fn load_config_from_str(toml_content: &str) -> Result<NjaaiaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NjaaiaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<NjaaiaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NjaaiaConfig::default()))
        .merge(Toml::file(path))
        .merge(bare_env_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(NjaaiaConfig::default()))
        .merge(Toml::file("/etc/njaaia/njaaia.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("njaaia/njaaia.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("njaaia.toml"))
        .merge(bare_env_provider())
        .merge(env_provider())
}

/// Maps a lowercased bare variable name onto its config path.
fn bare_key_path(key: &str) -> Option<&'static str> {
    BARE_ENV_KEYS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, path)| *path)
}

fn bare_env_provider() -> Env {
    let names: Vec<&str> = BARE_ENV_KEYS.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        let lower = key.as_str().to_ascii_lowercase();
        bare_key_path(&lower).unwrap_or(key.as_str()).to_string().into()
    })
}

/// Maps a prefix-stripped `NJAAIA_*` name onto its dotted config path.
///
/// Only the section prefix is rewritten, so `NJAAIA_OPENAI_API_KEY` becomes
/// `openai.api_key` rather than `openai.api.key`.
fn prefixed_key_path(key: &str) -> String {
    const SECTIONS: &[&str] = &["app", "server", "openai", "gemini", "completion", "envio"];
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

fn env_provider() -> Env {
    Env::prefixed("NJAAIA_").map(|key| {
        let lower = key.as_str().to_ascii_lowercase();
        prefixed_key_path(&lower).into()
    })
}
