//! Enrichment handlers: extraction, chat-log import, external lookups, and
//! notes cleanup.
//!
//! `/process-interaction`, `/process-chat-log` and `/update-contact` keep the
//! request shapes the browser client already sends; `/process-chat-log`
//! answers `{success, result}` or `{error}` rather than the envelope.

use std::time::Instant;

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

use rapport_core::enrichment::chat_log::ChunkContext;
use rapport_core::service::enrichment::ChatLogOutcome;
use rapport_types::contact::{Contact, ContactId};
use rapport_types::error::EnrichmentError;
use rapport_types::extraction::ExtractionResult;

use super::parse_id;
use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProcessInteractionBody {
    #[serde(default)]
    pub interaction: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactBody {
    #[serde(default)]
    pub contact_id: String,
    #[serde(default)]
    pub chat_log_insights: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatLogBody {
    pub transcript: String,
}

/// POST /api/v1/process-interaction - Extraction only, nothing is stored.
pub async fn process_interaction(
    State(state): State<AppState>,
    _auth: Authenticated,
    Json(body): Json<ProcessInteractionBody>,
) -> Result<Json<ApiResponse<ExtractionResult>>, AppError> {
    let start = Instant::now();
    let provider = state.llm()?;
    let result = state
        .enrichment_service
        .process_interaction(&provider, &body.interaction)
        .await?;
    Ok(Json(ApiResponse::timed(result, start)))
}

/// Multipart fields of one client-side chunk.
#[derive(Debug, Default)]
struct ChunkForm {
    chunk: String,
    contact_id: String,
    contact_name: String,
    contact_phone: Option<String>,
    chunk_index: Option<String>,
    total_chunks: Option<String>,
}

impl ChunkForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = ChunkForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Invalid field '{name}': {e}")))?;
            match name.as_str() {
                "chunk" => form.chunk = value,
                "contactId" => form.contact_id = value,
                "contactName" => form.contact_name = value,
                "contactPhone" => form.contact_phone = Some(value),
                "chunkIndex" => form.chunk_index = Some(value),
                "totalChunks" => form.total_chunks = Some(value),
                _ => {}
            }
        }
        Ok(form)
    }

    fn context(&self) -> Result<ChunkContext, AppError> {
        if self.chunk.trim().is_empty()
            || self.contact_id.trim().is_empty()
            || self.contact_name.trim().is_empty()
        {
            return Err(AppError::Validation(
                "Chunk, contact ID, and contact name are required".to_string(),
            ));
        }
        let index = parse_count(self.chunk_index.as_deref(), "chunkIndex")?.unwrap_or(0);
        let total = parse_count(self.total_chunks.as_deref(), "totalChunks")?.unwrap_or(index + 1);
        Ok(ChunkContext {
            contact_name: self.contact_name.trim().to_string(),
            contact_phone: self.contact_phone.clone(),
            index,
            total,
        })
    }
}

fn parse_count(raw: Option<&str>, name: &str) -> Result<Option<usize>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("{name} must be a non-negative integer"))),
    }
}

#[derive(Debug, Serialize)]
struct ChunkSummary {
    success: bool,
    result: String,
}

/// POST /api/v1/process-chat-log - Summarize one chunk of a chat export.
pub async fn process_chat_log(
    State(state): State<AppState>,
    _auth: Authenticated,
    multipart: Multipart,
) -> Response {
    let outcome = async {
        let form = ChunkForm::read(multipart).await?;
        let context = form.context()?;
        let provider = state.llm()?;
        let result = state
            .enrichment_service
            .summarize_chat_chunk(&provider, &context, &form.chunk)
            .await?;
        Ok::<_, AppError>(result)
    }
    .await;

    match outcome {
        Ok(result) => Json(ChunkSummary {
            success: true,
            result,
        })
        .into_response(),
        Err(err) => {
            let (status, message) = match err {
                AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
                AppError::Enrichment(e @ EnrichmentError::NotConfigured(_)) => {
                    (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
                }
                other => {
                    tracing::warn!("Error processing chat log chunk: {other:?}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            };
            (status, Json(json!({ "error": message }))).into_response()
        }
    }
}

/// POST /api/v1/update-contact - Append chat-log insights to the notes.
pub async fn update_contact(
    State(state): State<AppState>,
    _auth: Authenticated,
    Json(body): Json<UpdateContactBody>,
) -> Result<Json<ApiResponse<Contact>>, AppError> {
    let start = Instant::now();
    if body.contact_id.trim().is_empty() || body.chat_log_insights.trim().is_empty() {
        return Err(AppError::Validation(
            "Contact ID and chat log insights are required".to_string(),
        ));
    }
    let contact_id: ContactId = parse_id(body.contact_id.trim(), EnrichmentError::TargetNotFound)?;
    let contact = state
        .enrichment_service
        .append_chat_insights(&contact_id, &body.chat_log_insights)
        .await?;
    Ok(Json(ApiResponse::timed(contact, start)))
}

/// POST /api/v1/contacts/:id/chat-log - Chunk and summarize a whole transcript.
pub async fn import_chat_log(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
    Json(body): Json<ChatLogBody>,
) -> Result<Json<ApiResponse<ChatLogOutcome>>, AppError> {
    let start = Instant::now();
    let contact_id: ContactId = parse_id(&id, EnrichmentError::TargetNotFound)?;
    if body.transcript.trim().is_empty() {
        return Err(AppError::Validation("transcript is required".to_string()));
    }
    let provider = state.llm()?;
    let outcome = state
        .enrichment_service
        .import_chat_log(&provider, &contact_id, &body.transcript, |progress| {
            tracing::debug!(
                contact_id = %contact_id,
                completed = progress.completed,
                total = progress.total,
                "Chat log chunk summarized"
            );
        })
        .await?;
    Ok(Json(ApiResponse::timed(outcome, start)))
}

/// POST /api/v1/contacts/:id/breaches
pub async fn check_breaches(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Contact>>, AppError> {
    let start = Instant::now();
    let contact_id: ContactId = parse_id(&id, EnrichmentError::TargetNotFound)?;
    let client = state.breach_client()?;
    let contact = state
        .enrichment_service
        .check_breaches(&client, &contact_id)
        .await?;
    Ok(Json(ApiResponse::timed(contact, start)))
}

/// POST /api/v1/contacts/:id/profile
pub async fn enrich_profile(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Contact>>, AppError> {
    let start = Instant::now();
    let contact_id: ContactId = parse_id(&id, EnrichmentError::TargetNotFound)?;
    let client = state.profile_client()?;
    let contact = state
        .enrichment_service
        .enrich_profile(&client, &contact_id)
        .await?;
    Ok(Json(ApiResponse::timed(contact, start)))
}

/// POST /api/v1/contacts/:id/osint
pub async fn osint_lookup(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Contact>>, AppError> {
    let start = Instant::now();
    let contact_id: ContactId = parse_id(&id, EnrichmentError::TargetNotFound)?;
    let client = state.osint_client()?;
    let contact = state
        .enrichment_service
        .osint_lookup(&client, &contact_id)
        .await?;
    Ok(Json(ApiResponse::timed(contact, start)))
}

/// POST /api/v1/contacts/:id/tidy-notes
pub async fn tidy_notes(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Contact>>, AppError> {
    let start = Instant::now();
    let contact_id: ContactId = parse_id(&id, EnrichmentError::TargetNotFound)?;
    let provider = state.llm()?;
    let contact = state
        .enrichment_service
        .tidy_notes(&provider, &contact_id)
        .await?;
    Ok(Json(ApiResponse::timed(contact, start)))
}
