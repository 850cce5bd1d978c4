// SPDX-FileCopyrightText: 2026 Njaaia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the njaaia chat relay.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a mistyped key is
//! reported at startup instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level njaaia configuration.
///
/// Built once at startup and passed by reference into the provider and
/// gateway constructors. Every section is optional.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NjaaiaConfig {
    /// Application identity and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// OpenAI chat-completion credentials and endpoint.
    #[serde(default)]
    pub openai: ProviderConfig,

    /// Gemini credentials and its OpenAI-compatible endpoint.
    #[serde(default = "ProviderConfig::gemini")]
    pub gemini: ProviderConfig,

    /// Request shaping shared by every upstream provider.
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Blockchain indexer endpoints (reserved; not called by the relay).
    #[serde(default)]
    pub envio: EnvioConfig,
}

impl Default for NjaaiaConfig {
    fn default() -> Self {
        Self {
            app: AppConfig::default(),
            server: ServerConfig::default(),
            openai: ProviderConfig::openai(),
            gemini: ProviderConfig::gemini(),
            completion: CompletionConfig::default(),
            envio: EnvioConfig::default(),
        }
    }
}

/// Which upstream a configured credential selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamKind {
    OpenAi,
    Gemini,
}

impl UpstreamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            UpstreamKind::OpenAi => "openai",
            UpstreamKind::Gemini => "gemini",
        }
    }
}

impl NjaaiaConfig {
    /// Resolves the upstream to use: Gemini wins when both keys are set.
    ///
    /// Empty keys count as unset. Returns `None` when neither is configured.
    pub fn upstream(&self) -> Option<(UpstreamKind, &ProviderConfig)> {
        if self.gemini.has_key() {
            Some((UpstreamKind::Gemini, &self.gemini))
        } else if self.openai.has_key() {
            Some((UpstreamKind::OpenAi, &self.openai))
        } else {
            None
        }
    }

    /// Returns a copy with every API key replaced by a marker, for display.
    pub fn redacted(&self) -> NjaaiaConfig {
        let mut copy = self.clone();
        for provider in [&mut copy.openai, &mut copy.gemini] {
            if provider.api_key.is_some() {
                provider.api_key = Some("[REDACTED]".to_string());
            }
        }
        copy
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Application identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Display name, also used in the capability listing.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// One-line description.
    #[serde(default = "default_app_description")]
    pub description: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            description: default_app_description(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_name() -> String {
    "njaaia".to_string()
}

fn default_app_description() -> String {
    "Not Just Another AI Assistant".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Credentials and endpoint for one OpenAI-compatible upstream.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// API key. `None` (or empty) leaves this upstream unconfigured.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL; `/chat/completions` is appended.
    pub base_url: String,

    /// Model identifier sent with every request.
    pub model: String,
}

impl ProviderConfig {
    /// Default OpenAI endpoint and model.
    pub fn openai() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
        }
    }

    /// Default Gemini OpenAI-compatible endpoint and model.
    pub fn gemini() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            model: "gemini-2.0-flash".to_string(),
        }
    }

    /// True when a non-empty key is present.
    pub fn has_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::openai()
    }
}

/// Request shaping for chat-completion calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CompletionConfig {
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Token ceiling for blockchain-aware (tools) requests and streams.
    #[serde(default = "default_tools_max_tokens")]
    pub tools_max_tokens: u32,

    /// Token ceiling for simple requests.
    #[serde(default = "default_simple_max_tokens")]
    pub simple_max_tokens: u32,

    /// Replaces the built-in system instruction when set.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            tools_max_tokens: default_tools_max_tokens(),
            simple_max_tokens: default_simple_max_tokens(),
            system_prompt: None,
        }
    }
}

fn default_temperature() -> f32 {
    0.1
}

fn default_tools_max_tokens() -> u32 {
    1000
}

fn default_simple_max_tokens() -> u32 {
    500
}

/// Envio indexer endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EnvioConfig {
    #[serde(default = "default_hypersync_url")]
    pub hypersync_url: String,

    #[serde(default = "default_hyperindex_url")]
    pub hyperindex_url: String,

    #[serde(default = "default_ethereum_hypersync_url")]
    pub ethereum_hypersync_url: String,

    #[serde(default = "default_polygon_hypersync_url")]
    pub polygon_hypersync_url: String,

    #[serde(default = "default_arbitrum_hypersync_url")]
    pub arbitrum_hypersync_url: String,
}

impl Default for EnvioConfig {
    fn default() -> Self {
        Self {
            hypersync_url: default_hypersync_url(),
            hyperindex_url: default_hyperindex_url(),
            ethereum_hypersync_url: default_ethereum_hypersync_url(),
            polygon_hypersync_url: default_polygon_hypersync_url(),
            arbitrum_hypersync_url: default_arbitrum_hypersync_url(),
        }
    }
}

fn default_hypersync_url() -> String {
    "https://api.hypersync.xyz".to_string()
}

fn default_hyperindex_url() -> String {
    "https://api.hyperindex.xyz".to_string()
}

fn default_ethereum_hypersync_url() -> String {
    "https://ethereum.hypersync.xyz".to_string()
}

fn default_polygon_hypersync_url() -> String {
    "https://polygon.hypersync.xyz".to_string()
}

fn default_arbitrum_hypersync_url() -> String {
    "https://arbitrum.hypersync.xyz".to_string()
}
