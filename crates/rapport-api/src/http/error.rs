//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use rapport_types::error::{ContactError, EnrichmentError};
use rapport_types::llm::LlmError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Contact, interaction, or reminder CRUD errors.
    Contact(ContactError),
    /// Extraction, lookup, and notes-rewrite errors.
    Enrichment(EnrichmentError),
    /// Authentication failure.
    Unauthorized(String),
    /// Validation error.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ContactError> for AppError {
    fn from(e: ContactError) -> Self {
        AppError::Contact(e)
    }
}

impl From<EnrichmentError> for AppError {
    fn from(e: EnrichmentError) -> Self {
        AppError::Enrichment(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Contact(ContactError::NotFound) => {
                (StatusCode::NOT_FOUND, "CONTACT_NOT_FOUND", "Contact not found".to_string())
            }
            AppError::Contact(ContactError::InteractionNotFound) => (
                StatusCode::NOT_FOUND,
                "INTERACTION_NOT_FOUND",
                "Interaction not found".to_string(),
            ),
            AppError::Contact(ContactError::ReminderNotFound) => {
                (StatusCode::NOT_FOUND, "REMINDER_NOT_FOUND", "Reminder not found".to_string())
            }
            AppError::Contact(e @ (ContactError::InvalidName(_) | ContactError::InvalidField { .. })) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }
            AppError::Contact(e @ ContactError::StorageError(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
            }
            AppError::Enrichment(EnrichmentError::TargetNotFound) => {
                (StatusCode::NOT_FOUND, "CONTACT_NOT_FOUND", "Contact not found".to_string())
            }
            AppError::Enrichment(EnrichmentError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Enrichment(e @ EnrichmentError::NotConfigured(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "NOT_CONFIGURED", e.to_string())
            }
            AppError::Enrichment(e @ EnrichmentError::Timeout { .. }) => {
                (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT", e.to_string())
            }
            AppError::Enrichment(e @ EnrichmentError::Upstream { .. }) => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", e.to_string())
            }
            AppError::Enrichment(EnrichmentError::Extraction(LlmError::RateLimited { .. })) => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                "Completion provider rate limit hit, try again later".to_string(),
            ),
            AppError::Enrichment(e @ EnrichmentError::Extraction(_)) => {
                (StatusCode::BAD_GATEWAY, "EXTRACTION_ERROR", e.to_string())
            }
            AppError::Enrichment(e @ EnrichmentError::Storage(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::warn!(code, %status, "{message}");
        }

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
