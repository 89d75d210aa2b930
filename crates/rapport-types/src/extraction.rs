//! Transient result of running interaction notes through the extraction model.

use serde::{Deserialize, Serialize};

use crate::contact::{ContactFields, FieldValue, fields};

/// Structured fields and reminder candidates pulled from free text.
///
/// Never persisted as-is: `updated_info` goes through the merge engine and
/// `potential_reminders` through the reminder materializer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(rename = "updatedInfo", default)]
    pub updated_info: ContactFields,
    #[serde(rename = "potentialReminders", default)]
    pub potential_reminders: Vec<CandidateReminder>,
}

impl ExtractionResult {
    /// Result used when the model reply cannot be understood: the raw text
    /// lands in `otherInsights` and no reminders are proposed.
    pub fn fallback(raw: &str) -> Self {
        let mut updated_info = ContactFields::new();
        if !raw.trim().is_empty() {
            updated_info.insert(
                fields::OTHER_INSIGHTS.to_string(),
                FieldValue::Text(raw.to_string()),
            );
        }
        Self {
            updated_info,
            potential_reminders: Vec::new(),
        }
    }
}

/// A reminder proposed by the model; may be incomplete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateReminder {
    /// Short title. Candidates without one are skipped.
    #[serde(default)]
    pub reminder: String,
    /// Free-form date text, usually `DD MMM YYYY`.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
}

impl CandidateReminder {
    pub fn title(&self) -> Option<&str> {
        let title = self.reminder.trim();
        (!title.is_empty()).then_some(title)
    }
}
