//! Configuration and credential loading for Rapport.
//!
//! Settings come from `config.toml` in the data directory (`~/.rapport/` by
//! default). API keys never live in that file; they are read from the
//! environment and held as [`SecretString`]s.

use std::path::{Path, PathBuf};

use rapport_types::config::RapportConfig;
use secrecy::SecretString;

pub const DATA_DIR_ENV: &str = "RAPPORT_DATA_DIR";

/// Load configuration from `{data_dir}/config.toml`.
///
/// A missing file yields [`RapportConfig::default()`]. A file that cannot be
/// read or parsed is logged and also yields the defaults.
pub async fn load_config(data_dir: &Path) -> RapportConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return RapportConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return RapportConfig::default();
        }
    };

    match toml::from_str::<RapportConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            RapportConfig::default()
        }
    }
}

/// Data directory: `RAPPORT_DATA_DIR` if set, else `~/.rapport`.
pub fn resolve_data_dir() -> PathBuf {
    resolve_data_dir_from(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
}

fn resolve_data_dir_from(explicit: Option<PathBuf>) -> PathBuf {
    explicit.filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rapport")
    })
}

/// API keys for the completion providers and lookup services.
#[derive(Default, Clone)]
pub struct Credentials {
    pub openai: Option<SecretString>,
    pub anthropic: Option<SecretString>,
    pub hibp: Option<SecretString>,
    pub proxycurl: Option<SecretString>,
    pub osint: Option<SecretString>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key source. Blank values count as absent.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(SecretString::from)
        };
        Self {
            openai: get("OPENAI_API_KEY"),
            anthropic: get("ANTHROPIC_API_KEY"),
            hibp: get("HIBP_API_KEY"),
            proxycurl: get("PROXYCURL_API_KEY"),
            osint: get("OSINT_API_KEY"),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let set = |s: &Option<SecretString>| if s.is_some() { "set" } else { "unset" };
        f.debug_struct("Credentials")
            .field("openai", &set(&self.openai))
            .field("anthropic", &set(&self.anthropic))
            .field("hibp", &set(&self.hibp))
            .field("proxycurl", &set(&self.proxycurl))
            .field("osint", &set(&self.osint))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapport_types::llm::ProviderType;
    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config.chat_log.chunk_size, 200_000);
        assert_eq!(config.lookups.osint_timeout_secs, 45);
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[extraction]
provider = "anthropic"
model = "claude-3-5-haiku-latest"

[chat_log]
chunk_delay_ms = 0

[server]
port = 8080
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.extraction.provider, ProviderType::Anthropic);
        assert_eq!(config.extraction.model, "claude-3-5-haiku-latest");
        assert_eq!(config.chat_log.chunk_delay_ms, 0);
        assert_eq!(config.chat_log.chunk_size, 200_000);
        assert_eq!(config.server.port, 8080);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn data_dir_prefers_explicit_path() {
        let dir = resolve_data_dir_from(Some(PathBuf::from("/srv/rapport")));
        assert_eq!(dir, PathBuf::from("/srv/rapport"));

        let fallback = resolve_data_dir_from(Some(PathBuf::new()));
        assert!(fallback.ends_with(".rapport"));
    }

    #[test]
    fn credentials_skip_blank_values() {
        let creds = Credentials::from_lookup(|key| match key {
            "OPENAI_API_KEY" => Some(" sk-test ".to_string()),
            "HIBP_API_KEY" => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(creds.openai.as_ref().unwrap().expose_secret(), "sk-test");
        assert!(creds.hibp.is_none());
        assert!(creds.anthropic.is_none());
        assert!(!format!("{creds:?}").contains("sk-test"));
    }
}
