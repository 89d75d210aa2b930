//! Interaction repository trait definition.

use rapport_types::contact::ContactId;
use rapport_types::error::RepositoryError;
use rapport_types::interaction::{Interaction, InteractionId};

/// Repository trait for interaction persistence.
pub trait InteractionRepository: Send + Sync {
    fn create(
        &self,
        interaction: &Interaction,
    ) -> impl std::future::Future<Output = Result<Interaction, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &InteractionId,
    ) -> impl std::future::Future<Output = Result<Option<Interaction>, RepositoryError>> + Send;

    /// All interactions for a contact, newest date first.
    fn list_for_contact(
        &self,
        contact_id: &ContactId,
    ) -> impl std::future::Future<Output = Result<Vec<Interaction>, RepositoryError>> + Send;

    fn update(
        &self,
        interaction: &Interaction,
    ) -> impl std::future::Future<Output = Result<Interaction, RepositoryError>> + Send;

    fn delete(
        &self,
        id: &InteractionId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
