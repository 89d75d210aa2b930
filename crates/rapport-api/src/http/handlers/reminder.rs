//! Reminder handlers.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use rapport_core::repository::reminder::ReminderFilter;
use rapport_types::contact::ContactId;
use rapport_types::error::ContactError;
use rapport_types::reminder::{
    CreateReminderRequest, Reminder, ReminderId, UpdateReminderRequest,
};

use super::parse_id;
use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::extractors::query::ReminderListQuery;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Body of `POST /reminders/:id/complete`. An empty body marks it done.
#[derive(Debug, Deserialize)]
pub struct CompleteBody {
    #[serde(default = "default_completed")]
    pub completed: bool,
}

fn default_completed() -> bool {
    true
}

/// GET /api/v1/contacts/:id/reminders - Soonest first.
pub async fn list_contact_reminders(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Reminder>>>, AppError> {
    let start = Instant::now();
    let contact_id: ContactId = parse_id(&id, ContactError::NotFound)?;
    state.contact_service.get_contact(&contact_id).await?;
    let reminders = state
        .reminder_service
        .list_reminders_for_contact(&contact_id)
        .await?;
    Ok(Json(ApiResponse::timed(reminders, start)))
}

/// POST /api/v1/contacts/:id/reminders
pub async fn create_reminder(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
    Json(body): Json<CreateReminderRequest>,
) -> Result<Json<ApiResponse<Reminder>>, AppError> {
    let start = Instant::now();
    let contact_id: ContactId = parse_id(&id, ContactError::NotFound)?;
    let reminder = state
        .reminder_service
        .create_reminder(&contact_id, body)
        .await?;
    let link = format!("/api/v1/reminders/{}", reminder.id);
    Ok(Json(ApiResponse::timed(reminder, start).with_link("self", &link)))
}

/// GET /api/v1/reminders?pending=true&limit=N
pub async fn list_reminders(
    State(state): State<AppState>,
    _auth: Authenticated,
    Query(query): Query<ReminderListQuery>,
) -> Result<Json<ApiResponse<Vec<Reminder>>>, AppError> {
    let start = Instant::now();
    let filter = ReminderFilter {
        pending_only: query.pending,
        limit: query.limit,
    };
    let reminders = state.reminder_service.list_reminders(Some(filter)).await?;
    Ok(Json(
        ApiResponse::timed(reminders, start).with_link("self", "/api/v1/reminders"),
    ))
}

/// PUT /api/v1/reminders/:id
pub async fn update_reminder(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
    Json(body): Json<UpdateReminderRequest>,
) -> Result<Json<ApiResponse<Reminder>>, AppError> {
    let start = Instant::now();
    let id: ReminderId = parse_id(&id, ContactError::ReminderNotFound)?;
    let reminder = state.reminder_service.update_reminder(&id, body).await?;
    Ok(Json(ApiResponse::timed(reminder, start)))
}

/// POST /api/v1/reminders/:id/complete
pub async fn complete_reminder(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
    body: Option<Json<CompleteBody>>,
) -> Result<Json<ApiResponse<Reminder>>, AppError> {
    let start = Instant::now();
    let id: ReminderId = parse_id(&id, ContactError::ReminderNotFound)?;
    let completed = body.map(|Json(b)| b.completed).unwrap_or(true);
    let reminder = state
        .reminder_service
        .set_reminder_completed(&id, completed)
        .await?;
    Ok(Json(ApiResponse::timed(reminder, start)))
}

/// DELETE /api/v1/reminders/:id
pub async fn delete_reminder(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let id: ReminderId = parse_id(&id, ContactError::ReminderNotFound)?;
    state.reminder_service.delete_reminder(&id).await?;
    Ok(Json(ApiResponse::timed(
        serde_json::json!({ "deleted": true, "id": id }),
        start,
    )))
}
