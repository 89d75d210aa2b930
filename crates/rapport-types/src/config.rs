//! Configuration types for Rapport.
//!
//! `RapportConfig` represents `{data_dir}/config.toml`. Every section and
//! every key is optional; missing values take the defaults below.

use serde::{Deserialize, Serialize};

use crate::llm::ProviderType;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RapportConfig {
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub chat_log: ChatLogConfig,
    #[serde(default)]
    pub lookups: LookupConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Which completion backend the enrichment pipeline talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default)]
    pub provider: ProviderType,
    #[serde(default = "default_model")]
    pub model: String,
    /// Override for OpenAI-compatible endpoints (Ollama, OpenRouter, ...).
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            provider: ProviderType::default(),
            model: default_model(),
            base_url: None,
            max_tokens: default_max_tokens(),
        }
    }
}

/// Chat-log chunking parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatLogConfig {
    /// Maximum characters per chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Pause between successive chunk summarizations.
    #[serde(default = "default_chunk_delay_ms")]
    pub chunk_delay_ms: u64,
}

fn default_chunk_size() -> usize {
    200_000
}

fn default_chunk_delay_ms() -> u64 {
    1000
}

impl Default for ChatLogConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_delay_ms: default_chunk_delay_ms(),
        }
    }
}

/// Third-party lookup limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default = "default_osint_timeout_secs")]
    pub osint_timeout_secs: u64,
    /// Timeout for the breach and profile lookups.
    #[serde(default = "default_lookup_timeout_secs")]
    pub lookup_timeout_secs: u64,
    #[serde(default = "default_osint_max_string_len")]
    pub osint_max_string_len: usize,
    #[serde(default = "default_osint_max_array_len")]
    pub osint_max_array_len: usize,
}

fn default_osint_timeout_secs() -> u64 {
    45
}

fn default_lookup_timeout_secs() -> u64 {
    30
}

fn default_osint_max_string_len() -> usize {
    5000
}

fn default_osint_max_array_len() -> usize {
    100
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            osint_timeout_secs: default_osint_timeout_secs(),
            lookup_timeout_secs: default_lookup_timeout_secs(),
            osint_max_string_len: default_osint_max_string_len(),
            osint_max_array_len: default_osint_max_array_len(),
        }
    }
}

/// REST server bind address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}
