//! Contact repository trait definition.

use rapport_types::contact::{Contact, ContactFields, ContactId};
use rapport_types::error::RepositoryError;

/// Filter criteria for listing contacts.
///
/// Results are always ordered starred-first, then by name.
#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
    /// Only contacts owned by this user.
    pub user_id: Option<String>,
    pub starred_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Repository trait for contact persistence.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait ContactRepository: Send + Sync {
    /// Create a new contact. Returns the created contact.
    fn create(
        &self,
        contact: &Contact,
    ) -> impl std::future::Future<Output = Result<Contact, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &ContactId,
    ) -> impl std::future::Future<Output = Result<Option<Contact>, RepositoryError>> + Send;

    fn list(
        &self,
        filter: Option<ContactFilter>,
    ) -> impl std::future::Future<Output = Result<Vec<Contact>, RepositoryError>> + Send;

    /// Overwrite a contact (name, starred flag, and the whole field map).
    ///
    /// Returns `RepositoryError::NotFound` if the contact does not exist.
    fn update(
        &self,
        contact: &Contact,
    ) -> impl std::future::Future<Output = Result<Contact, RepositoryError>> + Send;

    /// Write only the given fields, leaving every other stored field alone.
    ///
    /// Returns `RepositoryError::NotFound` if the contact does not exist.
    fn update_fields(
        &self,
        id: &ContactId,
        fields: &ContactFields,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Permanently delete a contact. Interactions and reminders are left in place.
    fn delete(
        &self,
        id: &ContactId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
