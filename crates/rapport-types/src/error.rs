use thiserror::Error;

use crate::llm::LlmError;

/// Errors from direct CRUD on contacts, interactions, and reminders.
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("contact not found")]
    NotFound,

    #[error("interaction not found")]
    InteractionNotFound,

    #[error("reminder not found")]
    ReminderNotFound,

    #[error("invalid contact name: {0}")]
    InvalidName(String),

    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors from the enrichment pipeline and external lookups.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("target contact not found")]
    TargetNotFound,

    #[error("extraction failed: {0}")]
    Extraction(#[from] LlmError),

    #[error("{service} returned {status}: {message}")]
    Upstream {
        service: String,
        status: u16,
        message: String,
    },

    #[error("{service} timed out, try again later")]
    Timeout { service: String },

    #[error("{0} is not configured")]
    NotConfigured(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from repository operations (used by trait definitions in rapport-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<RepositoryError> for ContactError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ContactError::NotFound,
            other => ContactError::StorageError(other.to_string()),
        }
    }
}

impl From<RepositoryError> for EnrichmentError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => EnrichmentError::TargetNotFound,
            other => EnrichmentError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_asks_to_retry() {
        let err = EnrichmentError::Timeout {
            service: "osint".to_string(),
        };
        assert_eq!(err.to_string(), "osint timed out, try again later");
    }

    #[test]
    fn test_upstream_display() {
        let err = EnrichmentError::Upstream {
            service: "hibp".to_string(),
            status: 401,
            message: "unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "hibp returned 401: unauthorized");
    }

    #[test]
    fn test_repository_not_found_maps_to_domain_not_found() {
        assert!(matches!(
            ContactError::from(RepositoryError::NotFound),
            ContactError::NotFound
        ));
        assert!(matches!(
            EnrichmentError::from(RepositoryError::NotFound),
            EnrichmentError::TargetNotFound
        ));
    }

    #[test]
    fn test_repository_query_maps_to_storage() {
        let err = EnrichmentError::from(RepositoryError::Query("disk I/O".to_string()));
        assert_eq!(err.to_string(), "storage error: query error: disk I/O");
    }
}
