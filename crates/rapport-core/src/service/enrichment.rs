//! Enrichment service: everything that writes to a contact on the basis of
//! model output or an external lookup.
//!
//! The LLM provider and lookup clients are passed per call so a single
//! service can be driven by whichever backend the caller has configured.

use chrono::{Local, Utc};
use serde::Serialize;

use rapport_types::config::{LookupConfig, RapportConfig};
use rapport_types::contact::{Contact, ContactFields, ContactId, FieldValue, fields};
use rapport_types::error::EnrichmentError;
use rapport_types::extraction::ExtractionResult;
use rapport_types::interaction::{Interaction, InteractionId, NewInteraction};

use crate::enrichment::CompletionSettings;
use crate::enrichment::chat_log::{ChatLogProcessor, ChunkContext, ChunkProgress, split_into_chunks};
use crate::enrichment::extractor::InteractionExtractor;
use crate::enrichment::merge::merge_fields;
use crate::enrichment::reminders::{MaterializeReport, ReminderMaterializer};
use crate::enrichment::tidy::tidy_text;
use crate::llm::box_provider::BoxLlmProvider;
use crate::lookup::{
    BreachDirectory, OsintDirectory, ProfileDirectory, profile_to_fields, truncate_oversized,
};
use crate::repository::contact::ContactRepository;
use crate::repository::interaction::InteractionRepository;
use crate::repository::reminder::ReminderRepository;

/// Separator between existing notes and appended chat-log insights.
const INSIGHTS_SEPARATOR: &str = "\n\n";

/// Result of folding one extraction into a contact.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentOutcome {
    pub contact: Contact,
    pub changed_fields: Vec<String>,
    pub reminders: MaterializeReport,
}

/// A recorded interaction plus what enrichment made of it.
///
/// The interaction is saved before enrichment runs; an enrichment failure
/// is reported here and does not undo the save.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedInteraction {
    pub interaction: Interaction,
    pub enrichment: Option<EnrichmentOutcome>,
    pub enrichment_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatLogOutcome {
    pub contact: Contact,
    pub chunks: usize,
    pub summary: String,
}

pub struct EnrichmentService<C, I, R>
where
    C: ContactRepository,
    I: InteractionRepository,
    R: ReminderRepository,
{
    contacts: C,
    interactions: I,
    reminders: R,
    settings: CompletionSettings,
    extractor: InteractionExtractor,
    chat_log: ChatLogProcessor,
    chunk_size: usize,
    lookups: LookupConfig,
}

impl<C, I, R> EnrichmentService<C, I, R>
where
    C: ContactRepository,
    I: InteractionRepository,
    R: ReminderRepository,
{
    pub fn new(contacts: C, interactions: I, reminders: R, config: &RapportConfig) -> Self {
        let settings = CompletionSettings::from(&config.extraction);
        Self {
            contacts,
            interactions,
            reminders,
            extractor: InteractionExtractor::new(settings.clone()),
            chat_log: ChatLogProcessor::new(settings.clone(), &config.chat_log),
            settings,
            chunk_size: config.chat_log.chunk_size,
            lookups: config.lookups.clone(),
        }
    }

    async fn load(&self, contact_id: &ContactId) -> Result<Contact, EnrichmentError> {
        self.contacts
            .get_by_id(contact_id)
            .await?
            .ok_or(EnrichmentError::TargetNotFound)
    }

    /// Partial write of `updates`; returns the contact as it now stands.
    async fn write_fields(
        &self,
        mut contact: Contact,
        updates: ContactFields,
    ) -> Result<Contact, EnrichmentError> {
        self.contacts.update_fields(&contact.id, &updates).await?;
        contact.fields.extend(updates);
        contact.updated_at = Utc::now();
        Ok(contact)
    }

    /// Run notes through extraction without touching the store.
    pub async fn process_interaction(
        &self,
        provider: &BoxLlmProvider,
        notes: &str,
    ) -> Result<ExtractionResult, EnrichmentError> {
        if notes.trim().is_empty() {
            return Err(EnrichmentError::InvalidInput(
                "interaction text is required".to_string(),
            ));
        }
        Ok(self.extractor.extract(provider, notes).await?)
    }

    /// Extract from `notes`, merge into the contact, and materialize reminders.
    #[tracing::instrument(name = "enrich_contact", skip_all, fields(contact_id = %contact_id))]
    pub async fn enrich_contact(
        &self,
        provider: &BoxLlmProvider,
        contact_id: &ContactId,
        notes: &str,
    ) -> Result<EnrichmentOutcome, EnrichmentError> {
        let contact = self.load(contact_id).await?;
        self.enrich_loaded(provider, contact, notes).await
    }

    async fn enrich_loaded(
        &self,
        provider: &BoxLlmProvider,
        contact: Contact,
        notes: &str,
    ) -> Result<EnrichmentOutcome, EnrichmentError> {
        let extraction = self.extractor.extract(provider, notes).await?;
        self.apply_extraction(contact, &extraction).await
    }

    /// Merge an extraction result into a loaded contact and persist the changes.
    pub async fn apply_extraction(
        &self,
        contact: Contact,
        extraction: &ExtractionResult,
    ) -> Result<EnrichmentOutcome, EnrichmentError> {
        let merged = merge_fields(&contact, &extraction.updated_info);
        let changed_fields: Vec<String> = merged.changed.iter().cloned().collect();

        let contact = if merged.is_unchanged() {
            contact
        } else {
            let updates = merged.changed_fields();
            self.write_fields(contact, updates).await?
        };

        let reminders = ReminderMaterializer::materialize(
            &self.reminders,
            &contact.id,
            &extraction.potential_reminders,
            Local::now().date_naive(),
        )
        .await;

        tracing::info!(
            contact_id = %contact.id,
            changed = changed_fields.len(),
            reminders_created = reminders.created.len(),
            reminders_skipped = reminders.skipped,
            reminders_failed = reminders.failed.len(),
            "Enrichment applied"
        );

        Ok(EnrichmentOutcome {
            contact,
            changed_fields,
            reminders,
        })
    }

    /// Save an interaction, then enrich its contact from the notes.
    #[tracing::instrument(name = "record_interaction", skip_all, fields(contact_id = %contact_id))]
    pub async fn record_interaction(
        &self,
        provider: &BoxLlmProvider,
        contact_id: &ContactId,
        request: NewInteraction,
    ) -> Result<RecordedInteraction, EnrichmentError> {
        if request.notes.trim().is_empty() {
            return Err(EnrichmentError::InvalidInput(
                "interaction notes are required".to_string(),
            ));
        }
        let contact = self.load(contact_id).await?;

        let interaction = Interaction {
            id: InteractionId::new(),
            contact_id: *contact_id,
            date: request.date.unwrap_or_else(|| Local::now().date_naive()),
            kind: request.kind.trim().to_string(),
            notes: request.notes,
            created_at: Utc::now(),
        };
        let interaction = self.interactions.create(&interaction).await?;

        let (enrichment, enrichment_error) =
            match self.enrich_loaded(provider, contact, &interaction.notes).await {
                Ok(outcome) => (Some(outcome), None),
                Err(e) => {
                    tracing::warn!(error = %e, "Interaction saved but enrichment failed");
                    (None, Some(e.to_string()))
                }
            };

        Ok(RecordedInteraction {
            interaction,
            enrichment,
            enrichment_error,
        })
    }

    /// Summarize one chunk of a chat log (client-driven chunking).
    pub async fn summarize_chat_chunk(
        &self,
        provider: &BoxLlmProvider,
        context: &ChunkContext,
        chunk: &str,
    ) -> Result<String, EnrichmentError> {
        if chunk.trim().is_empty() || context.contact_name.trim().is_empty() {
            return Err(EnrichmentError::InvalidInput(
                "chunk and contact name are required".to_string(),
            ));
        }
        Ok(self.chat_log.summarize_chunk(provider, context, chunk).await?)
    }

    /// Append chat-log insights to `otherInsights`.
    ///
    /// Existing notes are kept and separated from the addition by a blank line.
    pub async fn append_chat_insights(
        &self,
        contact_id: &ContactId,
        insights: &str,
    ) -> Result<Contact, EnrichmentError> {
        let insights = insights.trim();
        if insights.is_empty() {
            return Err(EnrichmentError::InvalidInput(
                "chat log insights are required".to_string(),
            ));
        }

        let contact = self.load(contact_id).await?;
        let existing = contact
            .field(fields::OTHER_INSIGHTS)
            .map(FieldValue::to_text)
            .filter(|text| !text.trim().is_empty());
        let notes = match existing {
            Some(existing) => format!("{existing}{INSIGHTS_SEPARATOR}{insights}"),
            None => insights.to_string(),
        };

        let updates = ContactFields::from([(
            fields::OTHER_INSIGHTS.to_string(),
            FieldValue::Text(notes),
        )]);
        self.write_fields(contact, updates).await
    }

    /// Summarize a whole transcript server-side and append the result.
    ///
    /// Nothing is written unless every chunk succeeds.
    #[tracing::instrument(name = "import_chat_log", skip_all, fields(contact_id = %contact_id))]
    pub async fn import_chat_log(
        &self,
        provider: &BoxLlmProvider,
        contact_id: &ContactId,
        transcript: &str,
        on_progress: impl FnMut(ChunkProgress) + Send,
    ) -> Result<ChatLogOutcome, EnrichmentError> {
        let contact = self.load(contact_id).await?;
        let chunks = split_into_chunks(transcript, self.chunk_size).len();

        let summary = self
            .chat_log
            .process(
                provider,
                &contact.name,
                contact.text(fields::PHONE),
                transcript,
                on_progress,
            )
            .await?;

        let contact = if summary.is_empty() {
            contact
        } else {
            self.append_chat_insights(contact_id, &summary).await?
        };

        Ok(ChatLogOutcome {
            contact,
            chunks,
            summary,
        })
    }

    /// Look up breaches for the contact's email and store the summary.
    pub async fn check_breaches(
        &self,
        lookup: &impl BreachDirectory,
        contact_id: &ContactId,
    ) -> Result<Contact, EnrichmentError> {
        let contact = self.load(contact_id).await?;
        let email = required_text(&contact, fields::EMAIL, "contact has no email address")?;

        let report = lookup.breaches_for(&email).await?;
        tracing::info!(contact_id = %contact_id, breaches = report.breaches.len(), "Breach lookup done");

        let updates = ContactFields::from([(
            fields::BREACHES.to_string(),
            FieldValue::Text(report.summary()),
        )]);
        self.write_fields(contact, updates).await
    }

    /// Pull the contact's professional profile into `linkedin_*` fields.
    pub async fn enrich_profile(
        &self,
        lookup: &impl ProfileDirectory,
        contact_id: &ContactId,
    ) -> Result<Contact, EnrichmentError> {
        let contact = self.load(contact_id).await?;
        let url = required_text(&contact, fields::LINKEDIN, "contact has no profile URL")?;

        let profile = lookup.profile(&url).await?;
        self.write_fields(contact, profile_to_fields(&profile)).await
    }

    /// Run an OSINT search on the contact's email and store the trimmed payload.
    pub async fn osint_lookup(
        &self,
        lookup: &impl OsintDirectory,
        contact_id: &ContactId,
    ) -> Result<Contact, EnrichmentError> {
        let contact = self.load(contact_id).await?;
        let email = required_text(&contact, fields::EMAIL, "contact has no email address")?;

        let payload = lookup.search_email(&email).await?;
        let payload = truncate_oversized(
            payload,
            self.lookups.osint_max_string_len,
            self.lookups.osint_max_array_len,
        );

        let updates = ContactFields::from([(
            fields::OSINT.to_string(),
            FieldValue::Text(payload.to_string()),
        )]);
        self.write_fields(contact, updates).await
    }

    /// Rewrite `otherInsights` for readability, keeping all information.
    pub async fn tidy_notes(
        &self,
        provider: &BoxLlmProvider,
        contact_id: &ContactId,
    ) -> Result<Contact, EnrichmentError> {
        let contact = self.load(contact_id).await?;
        let notes = required_text(&contact, fields::OTHER_INSIGHTS, "contact has no notes to tidy")?;

        let tidied = tidy_text(provider, &self.settings, &notes).await?;
        if tidied.is_empty() {
            tracing::warn!(contact_id = %contact_id, "Tidy returned empty text; notes left unchanged");
            return Ok(contact);
        }

        let updates = ContactFields::from([(
            fields::OTHER_INSIGHTS.to_string(),
            FieldValue::Text(tidied),
        )]);
        self.write_fields(contact, updates).await
    }
}

fn required_text(contact: &Contact, field: &str, missing: &str) -> Result<String, EnrichmentError> {
    contact
        .text(field)
        .map(|s| s.trim().to_string())
        .ok_or_else(|| EnrichmentError::InvalidInput(missing.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        InMemoryContacts, InMemoryInteractions, InMemoryReminders, ScriptedProvider,
        sample_contact,
    };
    use rapport_types::llm::LlmError;
    use rapport_types::lookup::{BreachReport, ProfileSnapshot};
    use serde_json::{Value, json};

    type Service = EnrichmentService<InMemoryContacts, InMemoryInteractions, InMemoryReminders>;

    struct Fixture {
        service: Service,
        contacts: InMemoryContacts,
        interactions: InMemoryInteractions,
        reminders: InMemoryReminders,
        contact_id: ContactId,
    }

    fn fixture(fields: &[(&str, &str)]) -> Fixture {
        let contact = sample_contact("Maria", fields);
        let contact_id = contact.id;
        let contacts = InMemoryContacts::with(vec![contact]);
        let interactions = InMemoryInteractions::default();
        let reminders = InMemoryReminders::default();
        let mut config = RapportConfig::default();
        config.chat_log.chunk_delay_ms = 0;
        config.chat_log.chunk_size = 5;
        config.lookups.osint_max_string_len = 4;
        let service = EnrichmentService::new(
            contacts.clone(),
            interactions.clone(),
            reminders.clone(),
            &config,
        );
        Fixture {
            service,
            contacts,
            interactions,
            reminders,
            contact_id,
        }
    }

    const EXTRACTION_REPLY: &str = r#"{
        "updatedInfo": {"likes": ["travel"], "name": "Mallory", "otherInsights": "Planning a trip to Manila", "job_title": ""},
        "potentialReminders": [
            {"reminder": "Wish safe trip", "date": "12 Nov 2024", "description": "Manila"},
            {"reminder": "", "date": "", "description": "no title"}
        ]
    }"#;

    #[tokio::test]
    async fn test_enrich_contact_merges_and_materializes() {
        let f = fixture(&[(fields::OTHER_INSIGHTS, "Likes golf")]);
        let (provider, _) = ScriptedProvider::replying(vec![Ok(EXTRACTION_REPLY.to_string())]);

        let outcome = f
            .service
            .enrich_contact(&provider, &f.contact_id, "We talked about her trip")
            .await
            .unwrap();

        assert_eq!(outcome.changed_fields, vec!["likes", "otherInsights"]);
        assert_eq!(outcome.reminders.created.len(), 1);
        assert_eq!(outcome.reminders.skipped, 1);

        let stored = f.contacts.get(&f.contact_id).unwrap();
        assert_eq!(stored.name, "Maria");
        assert_eq!(
            stored.text(fields::OTHER_INSIGHTS),
            Some("Likes golf; Planning a trip to Manila")
        );
        assert_eq!(f.contacts.field_writes.lock().unwrap().len(), 1);
        assert_eq!(f.reminders.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_enrich_missing_contact_writes_nothing() {
        let f = fixture(&[]);
        let (provider, calls) = ScriptedProvider::replying(vec![Ok(EXTRACTION_REPLY.to_string())]);

        let err = f
            .service
            .enrich_contact(&provider, &ContactId::new(), "notes")
            .await
            .unwrap_err();

        assert!(matches!(err, EnrichmentError::TargetNotFound));
        assert!(calls.lock().unwrap().is_empty());
        assert!(f.contacts.field_writes.lock().unwrap().is_empty());
        assert!(f.reminders.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_reply_lands_in_insights() {
        let f = fixture(&[]);
        let (provider, _) =
            ScriptedProvider::replying(vec![Ok("She seems happy lately.".to_string())]);

        let outcome = f
            .service
            .enrich_contact(&provider, &f.contact_id, "notes")
            .await
            .unwrap();

        assert_eq!(
            outcome.contact.text(fields::OTHER_INSIGHTS),
            Some("She seems happy lately.")
        );
        assert!(outcome.reminders.created.is_empty());
    }

    #[tokio::test]
    async fn test_record_interaction_keeps_interaction_when_enrichment_fails() {
        let f = fixture(&[]);
        let (provider, _) = ScriptedProvider::replying(vec![Err(LlmError::Overloaded(
            "busy".to_string(),
        ))]);

        let recorded = f
            .service
            .record_interaction(
                &provider,
                &f.contact_id,
                NewInteraction {
                    date: None,
                    kind: "call".to_string(),
                    notes: "Caught up about work".to_string(),
                },
            )
            .await
            .unwrap();

        assert!(recorded.enrichment.is_none());
        assert!(recorded.enrichment_error.unwrap().contains("overloaded"));
        assert_eq!(f.interactions.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_record_interaction_for_missing_contact_saves_nothing() {
        let f = fixture(&[]);
        let (provider, _) = ScriptedProvider::replying(vec![]);

        let err = f
            .service
            .record_interaction(
                &provider,
                &ContactId::new(),
                NewInteraction {
                    date: None,
                    kind: String::new(),
                    notes: "hello".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, EnrichmentError::TargetNotFound));
        assert!(f.interactions.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_chat_insights_uses_blank_line() {
        let f = fixture(&[(fields::OTHER_INSIGHTS, "Met at conference")]);

        let contact = f
            .service
            .append_chat_insights(&f.contact_id, "Loves sailing")
            .await
            .unwrap();

        assert_eq!(
            contact.text(fields::OTHER_INSIGHTS),
            Some("Met at conference\n\nLoves sailing")
        );
    }

    #[tokio::test]
    async fn test_append_chat_insights_keeps_list_notes() {
        let f = fixture(&[]);
        f.contacts
            .rows
            .lock()
            .unwrap()
            .get_mut(&f.contact_id)
            .unwrap()
            .fields
            .insert(
                fields::OTHER_INSIGHTS.to_string(),
                FieldValue::List(vec!["Met at conference".to_string()]),
            );

        let contact = f
            .service
            .append_chat_insights(&f.contact_id, "Loves sailing")
            .await
            .unwrap();

        assert_eq!(
            contact.text(fields::OTHER_INSIGHTS),
            Some("Met at conference\n\nLoves sailing")
        );
    }

    #[tokio::test]
    async fn test_append_chat_insights_sets_when_empty() {
        let f = fixture(&[]);
        let contact = f
            .service
            .append_chat_insights(&f.contact_id, "Loves sailing")
            .await
            .unwrap();
        assert_eq!(contact.text(fields::OTHER_INSIGHTS), Some("Loves sailing"));

        assert!(matches!(
            f.service.append_chat_insights(&f.contact_id, " ").await.unwrap_err(),
            EnrichmentError::InvalidInput(_)
        ));
    }

    #[tokio::test]
    async fn test_import_chat_log_appends_joined_summary() {
        let f = fixture(&[(fields::PHONE, "+1 555 0100")]);
        let (provider, calls) = ScriptedProvider::replying(vec![
            Ok("Likes jazz.".to_string()),
            Ok("Works at Acme.".to_string()),
        ]);

        let outcome = f
            .service
            .import_chat_log(&provider, &f.contact_id, "0123456789", |_| {})
            .await
            .unwrap();

        assert_eq!(outcome.chunks, 2);
        assert_eq!(outcome.summary, "Likes jazz. Works at Acme.");
        assert_eq!(
            f.contacts.get(&f.contact_id).unwrap().text(fields::OTHER_INSIGHTS),
            Some("Likes jazz. Works at Acme.")
        );
        let calls = calls.lock().unwrap();
        assert!(calls[0].system.as_deref().unwrap().contains("+1 555 0100"));
    }

    #[tokio::test]
    async fn test_import_chat_log_failure_saves_nothing() {
        let f = fixture(&[]);
        let (provider, _) = ScriptedProvider::replying(vec![
            Ok("first".to_string()),
            Err(LlmError::AuthenticationFailed),
        ]);

        let err = f
            .service
            .import_chat_log(&provider, &f.contact_id, "0123456789", |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, EnrichmentError::Extraction(_)));
        assert!(f.contacts.field_writes.lock().unwrap().is_empty());
    }

    struct FixedBreaches(Vec<&'static str>);

    impl BreachDirectory for FixedBreaches {
        async fn breaches_for(&self, email: &str) -> Result<BreachReport, EnrichmentError> {
            assert_eq!(email, "maria@example.com");
            Ok(BreachReport {
                breaches: self.0.iter().map(|s| s.to_string()).collect(),
            })
        }
    }

    struct FixedProfile;

    impl ProfileDirectory for FixedProfile {
        async fn profile(&self, _url: &str) -> Result<ProfileSnapshot, EnrichmentError> {
            Ok(ProfileSnapshot {
                headline: Some("Founder".to_string()),
                ..Default::default()
            })
        }
    }

    struct SlowOsint;

    impl OsintDirectory for SlowOsint {
        async fn search_email(&self, _email: &str) -> Result<Value, EnrichmentError> {
            Err(EnrichmentError::Timeout {
                service: "osint".to_string(),
            })
        }
    }

    struct FixedOsint;

    impl OsintDirectory for FixedOsint {
        async fn search_email(&self, _email: &str) -> Result<Value, EnrichmentError> {
            Ok(json!({"bio": "abcdefgh"}))
        }
    }

    #[tokio::test]
    async fn test_check_breaches_writes_summary() {
        let f = fixture(&[(fields::EMAIL, "maria@example.com")]);

        let contact = f
            .service
            .check_breaches(&FixedBreaches(vec!["Adobe", "Canva"]), &f.contact_id)
            .await
            .unwrap();
        assert_eq!(contact.text(fields::BREACHES), Some("Adobe, Canva"));

        let contact = f
            .service
            .check_breaches(&FixedBreaches(vec![]), &f.contact_id)
            .await
            .unwrap();
        assert_eq!(contact.text(fields::BREACHES), Some("No breaches found"));
    }

    #[tokio::test]
    async fn test_lookups_require_source_field() {
        let f = fixture(&[]);
        assert!(matches!(
            f.service
                .check_breaches(&FixedBreaches(vec![]), &f.contact_id)
                .await
                .unwrap_err(),
            EnrichmentError::InvalidInput(_)
        ));
        assert!(matches!(
            f.service
                .enrich_profile(&FixedProfile, &f.contact_id)
                .await
                .unwrap_err(),
            EnrichmentError::InvalidInput(_)
        ));
    }

    #[tokio::test]
    async fn test_enrich_profile_writes_linkedin_fields() {
        let f = fixture(&[(fields::LINKEDIN, "https://linkedin.com/in/maria")]);
        let contact = f
            .service
            .enrich_profile(&FixedProfile, &f.contact_id)
            .await
            .unwrap();
        assert_eq!(contact.text("linkedin_headline"), Some("Founder"));
        assert_eq!(contact.text("linkedin_experience"), Some("[]"));
    }

    #[tokio::test]
    async fn test_osint_truncates_and_propagates_timeout() {
        let f = fixture(&[(fields::EMAIL, "maria@example.com")]);

        let contact = f
            .service
            .osint_lookup(&FixedOsint, &f.contact_id)
            .await
            .unwrap();
        let stored: Value = serde_json::from_str(contact.text(fields::OSINT).unwrap()).unwrap();
        assert_eq!(stored["bio"], json!("abcd... (truncated)"));

        let err = f
            .service
            .osint_lookup(&SlowOsint, &f.contact_id)
            .await
            .unwrap_err();
        assert!(matches!(err, EnrichmentError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_tidy_notes_replaces_insights() {
        let f = fixture(&[(fields::OTHER_INSIGHTS, "likes golf;has twins")]);
        let (provider, _) =
            ScriptedProvider::replying(vec![Ok("Likes golf. Has twins.".to_string())]);

        let contact = f.service.tidy_notes(&provider, &f.contact_id).await.unwrap();

        assert_eq!(
            contact.text(fields::OTHER_INSIGHTS),
            Some("Likes golf. Has twins.")
        );
    }

    #[tokio::test]
    async fn test_process_interaction_has_no_side_effects() {
        let f = fixture(&[]);
        let (provider, _) = ScriptedProvider::replying(vec![Ok(EXTRACTION_REPLY.to_string())]);

        let result = f
            .service
            .process_interaction(&provider, "We talked about her trip")
            .await
            .unwrap();

        assert_eq!(result.potential_reminders.len(), 2);
        assert!(f.contacts.field_writes.lock().unwrap().is_empty());
        assert!(f.reminders.rows.lock().unwrap().is_empty());
    }
}
