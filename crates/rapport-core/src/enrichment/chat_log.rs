//! Chat log chunker.
//!
//! Transcripts larger than one completion call can take are cut into
//! fixed-size character chunks and summarized one chunk at a time, strictly
//! in order, with a pause between calls. The summaries are joined into one
//! string. Any failed chunk aborts the run and discards earlier summaries.

use std::time::Duration;

use rapport_types::config::ChatLogConfig;
use rapport_types::error::EnrichmentError;
use rapport_types::llm::{CompletionRequest, LlmError, Message};

use super::CompletionSettings;
use crate::llm::box_provider::BoxLlmProvider;

/// Split `text` into consecutive chunks of at most `chunk_size` characters.
///
/// Cuts fall on character boundaries, never inside a UTF-8 sequence, and
/// ignore sentence structure. A `chunk_size` of zero is treated as one.
pub fn split_into_chunks(text: &str, chunk_size: usize) -> Vec<&str> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let end = text[start..]
            .char_indices()
            .nth(chunk_size)
            .map(|(offset, _)| start + offset)
            .unwrap_or(text.len());
        chunks.push(&text[start..end]);
        start = end;
    }

    chunks
}

/// Who the transcript is about and where this chunk sits in it.
#[derive(Debug, Clone)]
pub struct ChunkContext {
    pub contact_name: String,
    pub contact_phone: Option<String>,
    /// Zero-based.
    pub index: usize,
    pub total: usize,
}

impl ChunkContext {
    fn system_prompt(&self) -> String {
        let phone = match self.contact_phone.as_deref().map(str::trim) {
            Some(phone) if !phone.is_empty() => format!(" with phone number {phone}"),
            _ => String::new(),
        };
        format!(
            "You are an AI assistant that analyzes chat logs. \
Extract relevant information about the contact named {name}{phone}. \
Ignore messages from other people. Focus on likes, interests, job information, \
and any other relevant details about the contact. This is chunk {position} of {total}. \
Provide a concise summary of the information found in this chunk, organized by \
categories such as interests, work, and personal life.",
            name = self.contact_name,
            position = self.index + 1,
            total = self.total,
        )
    }
}

/// Progress notification emitted after each chunk completes.
#[derive(Debug, Clone, Copy)]
pub struct ChunkProgress {
    pub completed: usize,
    pub total: usize,
}

/// Drives sequential per-chunk summarization.
pub struct ChatLogProcessor {
    settings: CompletionSettings,
    chunk_size: usize,
    delay: Duration,
}

impl ChatLogProcessor {
    pub fn new(settings: CompletionSettings, config: &ChatLogConfig) -> Self {
        Self {
            settings,
            chunk_size: config.chunk_size,
            delay: Duration::from_millis(config.chunk_delay_ms),
        }
    }

    /// Summarize a single chunk.
    #[tracing::instrument(
        name = "summarize_chunk",
        skip(self, provider, chunk),
        fields(chunk = context.index + 1, total = context.total, chunk_len = chunk.len())
    )]
    pub async fn summarize_chunk(
        &self,
        provider: &BoxLlmProvider,
        context: &ChunkContext,
        chunk: &str,
    ) -> Result<String, LlmError> {
        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![Message::user(chunk)],
            system: Some(context.system_prompt()),
            max_tokens: self.settings.max_tokens,
            temperature: Some(0.2),
        };

        let response = provider.complete(&request).await?;
        Ok(response.content)
    }

    /// Summarize a whole transcript and return the joined summary.
    ///
    /// `on_progress` is called after every successful chunk.
    #[tracing::instrument(
        name = "process_chat_log",
        skip(self, provider, transcript, on_progress),
        fields(contact = %contact_name, transcript_len = transcript.len())
    )]
    pub async fn process(
        &self,
        provider: &BoxLlmProvider,
        contact_name: &str,
        contact_phone: Option<&str>,
        transcript: &str,
        mut on_progress: impl FnMut(ChunkProgress) + Send,
    ) -> Result<String, EnrichmentError> {
        if transcript.trim().is_empty() {
            return Err(EnrichmentError::InvalidInput(
                "chat log is empty".to_string(),
            ));
        }

        let chunks = split_into_chunks(transcript, self.chunk_size);
        let total = chunks.len();
        let mut summaries = Vec::with_capacity(total);

        tracing::info!(chunks = total, "Processing chat log");

        for (index, chunk) in chunks.into_iter().enumerate() {
            if index > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let context = ChunkContext {
                contact_name: contact_name.to_string(),
                contact_phone: contact_phone.map(str::to_string),
                index,
                total,
            };

            let summary = self
                .summarize_chunk(provider, &context, chunk)
                .await
                .map_err(|e| {
                    tracing::warn!(chunk = index + 1, error = %e, "Chunk failed; aborting chat log");
                    EnrichmentError::Extraction(e)
                })?;

            summaries.push(summary);
            on_progress(ChunkProgress {
                completed: index + 1,
                total,
            });
        }

        Ok(summaries.join(" ").trim().to_string())
    }
}
