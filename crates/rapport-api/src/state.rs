//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over the repository traits; AppState pins them to the
//! SQLite implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rapport_core::llm::box_provider::BoxLlmProvider;
use rapport_core::service::contact::ContactService;
use rapport_core::service::enrichment::EnrichmentService;
use rapport_core::service::interaction::InteractionService;
use rapport_core::service::reminder::ReminderService;
use rapport_infra::config::{Credentials, load_config, resolve_data_dir};
use rapport_infra::llm::create_provider;
use rapport_infra::lookup::{HibpClient, OsintIndustriesClient, ProxycurlClient};
use rapport_infra::sqlite::contact::SqliteContactRepository;
use rapport_infra::sqlite::interaction::SqliteInteractionRepository;
use rapport_infra::sqlite::pool::{DatabasePool, database_url};
use rapport_infra::sqlite::reminder::SqliteReminderRepository;
use rapport_types::config::RapportConfig;
use rapport_types::error::EnrichmentError;
use rapport_types::llm::ProviderType;

pub type ConcreteContactService = ContactService<SqliteContactRepository>;
pub type ConcreteInteractionService = InteractionService<SqliteInteractionRepository>;
pub type ConcreteReminderService =
    ReminderService<SqliteReminderRepository, SqliteContactRepository>;
pub type ConcreteEnrichmentService = EnrichmentService<
    SqliteContactRepository,
    SqliteInteractionRepository,
    SqliteReminderRepository,
>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub contact_service: Arc<ConcreteContactService>,
    pub interaction_service: Arc<ConcreteInteractionService>,
    pub reminder_service: Arc<ConcreteReminderService>,
    pub enrichment_service: Arc<ConcreteEnrichmentService>,
    pub config: Arc<RapportConfig>,
    pub credentials: Arc<Credentials>,
    /// `None` when the configured provider has no API key.
    llm: Option<Arc<BoxLlmProvider>>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;
        let credentials = Credentials::from_env();
        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;

        let llm = match create_provider(&config.extraction, &credentials) {
            Ok(provider) => {
                tracing::debug!(provider = provider.name(), "Completion provider ready");
                Some(provider)
            }
            Err(e) => {
                tracing::debug!("Completion provider unavailable: {e}");
                None
            }
        };

        Ok(Self::from_parts(db_pool, data_dir, config, credentials, llm))
    }

    /// Wire services over an open pool.
    pub fn from_parts(
        db_pool: DatabasePool,
        data_dir: PathBuf,
        config: RapportConfig,
        credentials: Credentials,
        llm: Option<BoxLlmProvider>,
    ) -> Self {
        let contacts = SqliteContactRepository::new(db_pool.clone());
        let interactions = SqliteInteractionRepository::new(db_pool.clone());
        let reminders = SqliteReminderRepository::new(db_pool.clone());

        let enrichment_service = EnrichmentService::new(
            contacts.clone(),
            interactions.clone(),
            reminders.clone(),
            &config,
        );

        Self {
            contact_service: Arc::new(ContactService::new(contacts.clone())),
            interaction_service: Arc::new(InteractionService::new(interactions)),
            reminder_service: Arc::new(ReminderService::new(reminders, contacts)),
            enrichment_service: Arc::new(enrichment_service),
            config: Arc::new(config),
            credentials: Arc::new(credentials),
            llm: llm.map(Arc::new),
            data_dir,
            db_pool,
        }
    }

    /// The completion provider, or `NotConfigured` naming the missing key.
    pub fn llm(&self) -> Result<Arc<BoxLlmProvider>, EnrichmentError> {
        self.llm.clone().ok_or_else(|| {
            let key = match self.config.extraction.provider {
                ProviderType::Anthropic => "ANTHROPIC_API_KEY",
                ProviderType::OpenAiCompatible => "OPENAI_API_KEY",
            };
            EnrichmentError::NotConfigured(key.to_string())
        })
    }

    fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.config.lookups.lookup_timeout_secs)
    }

    pub fn breach_client(&self) -> Result<HibpClient, EnrichmentError> {
        let key = self
            .credentials
            .hibp
            .clone()
            .ok_or_else(|| EnrichmentError::NotConfigured("HIBP_API_KEY".to_string()))?;
        HibpClient::new(key, self.lookup_timeout())
    }

    pub fn profile_client(&self) -> Result<ProxycurlClient, EnrichmentError> {
        let key = self
            .credentials
            .proxycurl
            .clone()
            .ok_or_else(|| EnrichmentError::NotConfigured("PROXYCURL_API_KEY".to_string()))?;
        ProxycurlClient::new(key, self.lookup_timeout())
    }

    /// OSINT searches run server-side and get their own, longer, bound.
    pub fn osint_client(&self) -> Result<OsintIndustriesClient, EnrichmentError> {
        let key = self
            .credentials
            .osint
            .clone()
            .ok_or_else(|| EnrichmentError::NotConfigured("OSINT_API_KEY".to_string()))?;
        OsintIndustriesClient::new(
            key,
            Duration::from_secs(self.config.lookups.osint_timeout_secs),
        )
    }
}
