//! Contact enrichment pipeline.
//!
//! Free text (interaction notes or a chat transcript) goes to the completion
//! model; structured candidates come back and are folded into the contact
//! record without losing anything already stored.
//!
//! - [`extractor`]: notes -> `ExtractionResult`
//! - [`merge`] + [`policy`]: `ExtractionResult.updated_info` -> new contact record
//! - [`reminders`]: `ExtractionResult.potential_reminders` -> persisted reminders
//! - [`chat_log`]: transcript -> chunked summaries -> one notes string
//! - [`tidy`]: rewrite of the freeform notes field

pub mod chat_log;
pub mod extractor;
pub mod merge;
pub mod policy;
pub mod reminders;
pub mod tidy;

use rapport_types::config::ExtractionConfig;

/// Model parameters shared by every completion the pipeline makes.
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub model: String,
    pub max_tokens: u32,
}

impl From<&ExtractionConfig> for CompletionSettings {
    fn from(config: &ExtractionConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self::from(&ExtractionConfig::default())
    }
}

/// First `max_chars` characters of `text`, for log previews.
pub(crate) fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
