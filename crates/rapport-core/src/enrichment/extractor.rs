//! Interaction note extraction via LLM.
//!
//! `InteractionExtractor` asks the model to pull contact details and
//! follow-up reminders out of free-text notes. Parsing is lenient: a reply
//! that is not JSON, or lacks `updatedInfo`, becomes a fallback result that
//! stores the raw reply under `otherInsights`. Only provider errors fail.

use serde_json::Value;

use rapport_types::contact::{ContactFields, EXTRACTABLE_FIELDS, FieldValue};
use rapport_types::extraction::{CandidateReminder, ExtractionResult};
use rapport_types::llm::{CompletionRequest, LlmError, Message};

use super::{CompletionSettings, preview};
use crate::llm::box_provider::BoxLlmProvider;

const PROMPT_PREAMBLE: &str = "You are an AI assistant that processes interaction notes and extracts relevant information about the contact.
Carefully analyze the interaction and extract the following information:
";

const PROMPT_INSTRUCTIONS: &str = r#"
Also identify any potential reminders or important dates mentioned in the interaction.

Respond with a JSON object only, containing:
- "updatedInfo": an object with the extracted information, using the exact field names above. Use an empty string for fields that are not mentioned, and an array for "likes".
- "potentialReminders": an array of objects, each with "reminder" (short title), "date" (format 'DD MMM YYYY') and "description".

Example response:
{
  "updatedInfo": {
    "likes": ["traveling"],
    "job_title": "",
    "otherInsights": "Planning a trip to Manila"
  },
  "potentialReminders": [
    {"reminder": "Wish safe trip to Manila", "date": "12 Nov 2024", "description": "Contact is traveling to Manila"}
  ]
}"#;

/// Build the extraction system prompt from the list of extractable fields.
pub fn extraction_prompt() -> String {
    let mut prompt = String::from(PROMPT_PREAMBLE);
    for field in EXTRACTABLE_FIELDS {
        prompt.push_str("- ");
        prompt.push_str(field);
        if *field == "likes" {
            prompt.push_str(" (as an array)");
        }
        prompt.push('\n');
    }
    prompt.push_str(PROMPT_INSTRUCTIONS);
    prompt
}

/// Extracts structured contact details from interaction notes.
pub struct InteractionExtractor {
    settings: CompletionSettings,
}

impl InteractionExtractor {
    pub fn new(settings: CompletionSettings) -> Self {
        Self { settings }
    }

    /// Send notes to the model and parse the reply.
    ///
    /// Blank notes short-circuit to an empty result without a model call.
    #[tracing::instrument(
        name = "extract_interaction",
        skip(self, provider, notes),
        fields(provider = provider.name(), notes_len = notes.len())
    )]
    pub async fn extract(
        &self,
        provider: &BoxLlmProvider,
        notes: &str,
    ) -> Result<ExtractionResult, LlmError> {
        if notes.trim().is_empty() {
            return Ok(ExtractionResult::default());
        }

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![Message::user(format!(
                "Process this interaction and extract relevant information: \"{notes}\""
            ))],
            system: Some(extraction_prompt()),
            max_tokens: self.settings.max_tokens,
            temperature: Some(0.0),
        };

        let response = provider.complete(&request).await?;
        let result = parse_extraction(&response.content);

        tracing::debug!(
            fields = result.updated_info.len(),
            reminders = result.potential_reminders.len(),
            "Extraction parsed"
        );

        Ok(result)
    }
}

/// Parse a model reply into an [`ExtractionResult`], never failing.
pub fn parse_extraction(raw: &str) -> ExtractionResult {
    let body = strip_code_fence(raw.trim());

    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                error = %e,
                content_preview = preview(body, 200),
                "Extraction reply is not JSON; storing raw text as insights"
            );
            return ExtractionResult::fallback(raw.trim());
        }
    };

    let Some(info) = value.get("updatedInfo").and_then(Value::as_object) else {
        tracing::warn!(
            content_preview = preview(body, 200),
            "Extraction reply has no updatedInfo object; storing raw text as insights"
        );
        return ExtractionResult::fallback(raw.trim());
    };

    let updated_info: ContactFields = info
        .iter()
        .filter_map(|(name, value)| {
            FieldValue::from_json(value)
                .filter(|v| !v.is_empty())
                .map(|v| (name.clone(), v))
        })
        .collect();

    let potential_reminders = value
        .get("potentialReminders")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(candidate_from_json).collect())
        .unwrap_or_default();

    ExtractionResult {
        updated_info,
        potential_reminders,
    }
}

fn candidate_from_json(value: &Value) -> Option<CandidateReminder> {
    let object = value.as_object()?;
    let text = |key: &str| match object.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    Some(CandidateReminder {
        reminder: text("reminder"),
        date: text("date"),
        description: text("description"),
    })
}

/// Models often wrap JSON in a markdown fence; unwrap it.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedProvider;
    use rapport_types::contact::fields;

    #[test]
    fn test_prompt_lists_every_field() {
        let prompt = extraction_prompt();
        for field in EXTRACTABLE_FIELDS {
            assert!(prompt.contains(&format!("- {field}")), "missing {field}");
        }
        assert!(prompt.contains("likes (as an array)"));
        assert!(prompt.contains("DD MMM YYYY"));
    }

    #[test]
    fn test_parse_well_formed_reply() {
        let raw = r#"{
            "updatedInfo": {"likes": ["traveling"], "job_title": "", "otherInsights": "Planning a trip"},
            "potentialReminders": [{"reminder": "Wish safe trip", "date": "12 Nov 2024", "description": "Manila"}]
        }"#;
        let result = parse_extraction(raw);

        assert_eq!(
            result.updated_info.get(fields::LIKES),
            Some(&FieldValue::List(vec!["traveling".to_string()]))
        );
        assert!(!result.updated_info.contains_key("job_title"));
        assert_eq!(result.potential_reminders.len(), 1);
        assert_eq!(result.potential_reminders[0].date, "12 Nov 2024");
    }

    #[test]
    fn test_malformed_json_falls_back_to_insights() {
        let result = parse_extraction("Sorry, I could not find anything useful.");
        assert_eq!(result.updated_info.len(), 1);
        assert_eq!(
            result.updated_info.get(fields::OTHER_INSIGHTS),
            Some(&FieldValue::from("Sorry, I could not find anything useful."))
        );
        assert!(result.potential_reminders.is_empty());
    }

    #[test]
    fn test_missing_updated_info_falls_back() {
        let raw = r#"{"potentialReminders": []}"#;
        let result = parse_extraction(raw);
        assert_eq!(
            result.updated_info.get(fields::OTHER_INSIGHTS),
            Some(&FieldValue::from(raw))
        );
        assert!(result.potential_reminders.is_empty());
    }

    #[test]
    fn test_fenced_reply_is_unwrapped() {
        let raw = "```json\n{\"updatedInfo\": {\"company\": \"Acme\"}}\n```";
        let result = parse_extraction(raw);
        assert_eq!(
            result.updated_info.get("company"),
            Some(&FieldValue::from("Acme"))
        );
    }

    #[test]
    fn test_loose_reminder_entries() {
        let raw = r#"{"updatedInfo": {}, "potentialReminders": [
            {"reminder": null, "date": 20241112},
            "not an object",
            {"reminder": "Call"}
        ]}"#;
        let result = parse_extraction(raw);
        assert_eq!(result.potential_reminders.len(), 2);
        assert_eq!(result.potential_reminders[0].reminder, "");
        assert_eq!(result.potential_reminders[0].date, "20241112");
        assert_eq!(result.potential_reminders[1].title(), Some("Call"));
    }

    #[tokio::test]
    async fn test_extract_sends_notes_to_provider() {
        let (provider, calls) = ScriptedProvider::replying(vec![Ok(
            r#"{"updatedInfo": {"company": "Acme"}, "potentialReminders": []}"#.to_string(),
        )]);
        let extractor = InteractionExtractor::new(CompletionSettings::default());

        let result = extractor
            .extract(&provider, "She just joined Acme")
            .await
            .unwrap();

        assert_eq!(
            result.updated_info.get("company"),
            Some(&FieldValue::from("Acme"))
        );
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].messages[0].content.contains("She just joined Acme"));
        assert_eq!(calls[0].temperature, Some(0.0));
    }

    #[tokio::test]
    async fn test_extract_blank_notes_skips_provider() {
        let (provider, calls) = ScriptedProvider::replying(vec![]);
        let extractor = InteractionExtractor::new(CompletionSettings::default());

        let result = extractor.extract(&provider, "   ").await.unwrap();

        assert_eq!(result, ExtractionResult::default());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_extract_propagates_provider_error() {
        let (provider, _) = ScriptedProvider::replying(vec![Err(LlmError::AuthenticationFailed)]);
        let extractor = InteractionExtractor::new(CompletionSettings::default());

        let err = extractor.extract(&provider, "notes").await.unwrap_err();
        assert!(matches!(err, LlmError::AuthenticationFailed));
    }
}
