//! Contact CRUD handlers for the REST API.
//!
//! Direct edits overwrite fields; merging only happens through enrichment.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};

use rapport_core::repository::contact::ContactFilter;
use rapport_types::contact::{Contact, ContactId, CreateContactRequest, UpdateContactRequest};
use rapport_types::error::ContactError;

use super::parse_id;
use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::extractors::query::ContactListQuery;
use crate::http::response::ApiResponse;
use crate::state::AppState;

fn contact_links(resp: ApiResponse<Contact>, id: &ContactId) -> ApiResponse<Contact> {
    resp.with_link("self", &format!("/api/v1/contacts/{id}"))
        .with_link("interactions", &format!("/api/v1/contacts/{id}/interactions"))
        .with_link("reminders", &format!("/api/v1/contacts/{id}/reminders"))
}

/// POST /api/v1/contacts - Create a new contact.
pub async fn create_contact(
    State(state): State<AppState>,
    _auth: Authenticated,
    Json(body): Json<CreateContactRequest>,
) -> Result<Json<ApiResponse<Contact>>, AppError> {
    let start = Instant::now();
    let contact = state.contact_service.create_contact(body).await?;
    let id = contact.id;
    Ok(Json(contact_links(ApiResponse::timed(contact, start), &id)))
}

/// GET /api/v1/contacts - List contacts, starred first then by name.
pub async fn list_contacts(
    State(state): State<AppState>,
    _auth: Authenticated,
    Query(query): Query<ContactListQuery>,
) -> Result<Json<ApiResponse<Vec<Contact>>>, AppError> {
    let start = Instant::now();
    let filter = ContactFilter {
        user_id: None,
        starred_only: query.starred,
        limit: query.limit,
        offset: query.offset,
    };
    let contacts = state.contact_service.list_contacts(Some(filter)).await?;
    Ok(Json(
        ApiResponse::timed(contacts, start).with_link("self", "/api/v1/contacts"),
    ))
}

/// GET /api/v1/contacts/:id
pub async fn get_contact(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Contact>>, AppError> {
    let start = Instant::now();
    let id: ContactId = parse_id(&id, ContactError::NotFound)?;
    let contact = state.contact_service.get_contact(&id).await?;
    Ok(Json(contact_links(ApiResponse::timed(contact, start), &id)))
}

/// PUT /api/v1/contacts/:id - Overwrite name, starred flag, or fields.
pub async fn update_contact(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
    Json(body): Json<UpdateContactRequest>,
) -> Result<Json<ApiResponse<Contact>>, AppError> {
    let start = Instant::now();
    let id: ContactId = parse_id(&id, ContactError::NotFound)?;
    let contact = state.contact_service.update_contact(&id, body).await?;
    Ok(Json(contact_links(ApiResponse::timed(contact, start), &id)))
}

/// DELETE /api/v1/contacts/:id
pub async fn delete_contact(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let id: ContactId = parse_id(&id, ContactError::NotFound)?;
    state.contact_service.delete_contact(&id).await?;
    Ok(Json(ApiResponse::timed(
        serde_json::json!({ "deleted": true, "id": id }),
        start,
    )))
}

/// POST /api/v1/contacts/:id/star - Toggle the starred flag.
pub async fn toggle_star(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Contact>>, AppError> {
    let start = Instant::now();
    let id: ContactId = parse_id(&id, ContactError::NotFound)?;
    let contact = state.contact_service.toggle_star(&id).await?;
    Ok(Json(contact_links(ApiResponse::timed(contact, start), &id)))
}
