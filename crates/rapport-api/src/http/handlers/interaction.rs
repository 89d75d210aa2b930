//! Interaction log handlers.
//!
//! Recording an interaction also runs extraction, merge and reminder
//! materialization against the contact.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};

use rapport_core::service::enrichment::RecordedInteraction;
use rapport_types::contact::ContactId;
use rapport_types::error::{ContactError, EnrichmentError};
use rapport_types::interaction::{
    Interaction, InteractionId, NewInteraction, UpdateInteractionRequest,
};

use super::parse_id;
use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/contacts/:id/interactions - Newest first.
pub async fn list_interactions(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Interaction>>>, AppError> {
    let start = Instant::now();
    let contact_id: ContactId = parse_id(&id, ContactError::NotFound)?;
    state.contact_service.get_contact(&contact_id).await?;
    let interactions = state
        .interaction_service
        .list_interactions(&contact_id)
        .await?;
    Ok(Json(ApiResponse::timed(interactions, start).with_link(
        "self",
        &format!("/api/v1/contacts/{contact_id}/interactions"),
    )))
}

/// POST /api/v1/contacts/:id/interactions - Save, then enrich the contact.
pub async fn record_interaction(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
    Json(body): Json<NewInteraction>,
) -> Result<Json<ApiResponse<RecordedInteraction>>, AppError> {
    let start = Instant::now();
    let contact_id: ContactId = parse_id(&id, EnrichmentError::TargetNotFound)?;
    let provider = state.llm()?;
    let recorded = state
        .enrichment_service
        .record_interaction(&provider, &contact_id, body)
        .await?;
    Ok(Json(
        ApiResponse::timed(recorded, start)
            .with_link("contact", &format!("/api/v1/contacts/{contact_id}")),
    ))
}

/// PUT /api/v1/interactions/:id - Explicit edit; does not re-run enrichment.
pub async fn update_interaction(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
    Json(body): Json<UpdateInteractionRequest>,
) -> Result<Json<ApiResponse<Interaction>>, AppError> {
    let start = Instant::now();
    let id: InteractionId = parse_id(&id, ContactError::InteractionNotFound)?;
    let interaction = state.interaction_service.update_interaction(&id, body).await?;
    Ok(Json(ApiResponse::timed(interaction, start)))
}

/// DELETE /api/v1/interactions/:id
pub async fn delete_interaction(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let id: InteractionId = parse_id(&id, ContactError::InteractionNotFound)?;
    state.interaction_service.delete_interaction(&id).await?;
    Ok(Json(ApiResponse::timed(
        serde_json::json!({ "deleted": true, "id": id }),
        start,
    )))
}
