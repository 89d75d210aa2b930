//! LLM rewrite of the freeform notes field.

use rapport_types::llm::{CompletionRequest, LlmError, Message};

use super::CompletionSettings;
use crate::llm::box_provider::BoxLlmProvider;

const TIDY_SYSTEM_PROMPT: &str = "You are an AI assistant that tidies and formats text. \
Improve the formatting, correct any grammatical errors, and organize the information \
in a clear and concise manner. Maintain all the original information but present it \
in a more readable format. Reply with the rewritten text only.";

#[tracing::instrument(name = "tidy_notes", skip(provider, settings, text), fields(text_len = text.len()))]
pub async fn tidy_text(
    provider: &BoxLlmProvider,
    settings: &CompletionSettings,
    text: &str,
) -> Result<String, LlmError> {
    let request = CompletionRequest {
        model: settings.model.clone(),
        messages: vec![Message::user(text)],
        system: Some(TIDY_SYSTEM_PROMPT.to_string()),
        max_tokens: settings.max_tokens,
        temperature: Some(0.2),
    };

    let response = provider.complete(&request).await?;
    Ok(response.content.trim().to_string())
}
