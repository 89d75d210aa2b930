//! Completion providers for the enrichment pipeline.
//!
//! [`create_provider`] builds the configured backend and pairs it with the
//! matching credential.

pub mod anthropic;
pub mod openai_compat;

use rapport_core::llm::box_provider::BoxLlmProvider;
use rapport_types::config::ExtractionConfig;
use rapport_types::error::EnrichmentError;
use rapport_types::llm::ProviderType;

use self::anthropic::AnthropicProvider;
use self::openai_compat::OpenAiCompatibleProvider;
use crate::config::Credentials;

/// Build the completion provider named in `[extraction]`.
///
/// A missing API key is reported as [`EnrichmentError::NotConfigured`] so the
/// HTTP layer can answer before any work starts.
pub fn create_provider(
    config: &ExtractionConfig,
    credentials: &Credentials,
) -> Result<BoxLlmProvider, EnrichmentError> {
    match config.provider {
        ProviderType::Anthropic => {
            let key = credentials
                .anthropic
                .clone()
                .ok_or_else(|| EnrichmentError::NotConfigured("ANTHROPIC_API_KEY".to_string()))?;
            let mut provider = AnthropicProvider::new(key, config.model.clone())?;
            if let Some(base_url) = config.base_url.as_deref() {
                provider = provider.with_base_url(base_url);
            }
            Ok(BoxLlmProvider::new(provider))
        }
        ProviderType::OpenAiCompatible => {
            let key = credentials
                .openai
                .clone()
                .ok_or_else(|| EnrichmentError::NotConfigured("OPENAI_API_KEY".to_string()))?;
            let oai_config = match config.base_url.as_deref() {
                Some(base_url) => openai_compat::config::custom(key, &config.model, base_url),
                None => openai_compat::config::openai_defaults(key, &config.model),
            };
            Ok(BoxLlmProvider::new(OpenAiCompatibleProvider::new(oai_config)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn credentials() -> Credentials {
        Credentials {
            openai: Some(SecretString::from("sk-openai")),
            anthropic: Some(SecretString::from("sk-ant")),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_openai_by_default() {
        let provider = create_provider(&ExtractionConfig::default(), &credentials()).unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_create_openai_with_base_url() {
        let config = ExtractionConfig {
            base_url: Some("http://localhost:11434/v1".to_string()),
            ..Default::default()
        };
        let provider = create_provider(&config, &credentials()).unwrap();
        assert_eq!(provider.name(), "openai-compatible");
    }

    #[test]
    fn test_create_anthropic() {
        let config = ExtractionConfig {
            provider: ProviderType::Anthropic,
            model: "claude-3-5-haiku-latest".to_string(),
            ..Default::default()
        };
        let provider = create_provider(&config, &credentials()).unwrap();
        assert_eq!(provider.name(), "anthropic");
    }

    #[test]
    fn test_missing_key_is_not_configured() {
        let config = ExtractionConfig {
            provider: ProviderType::Anthropic,
            ..Default::default()
        };
        let result = create_provider(&config, &Credentials::default());
        match result {
            Err(EnrichmentError::NotConfigured(name)) => assert_eq!(name, "ANTHROPIC_API_KEY"),
            Err(other) => panic!("Expected NotConfigured, got: {other}"),
            Ok(_) => panic!("Expected error but got Ok"),
        }
    }
}
