//! Interaction log service: listing and explicit edits.
//!
//! Recording a new interaction also runs enrichment, so that lives in
//! [`super::enrichment::EnrichmentService::record_interaction`].

use rapport_types::contact::ContactId;
use rapport_types::error::{ContactError, RepositoryError};
use rapport_types::interaction::{Interaction, InteractionId, UpdateInteractionRequest};

use crate::repository::interaction::InteractionRepository;

pub struct InteractionService<I: InteractionRepository> {
    repo: I,
}

impl<I: InteractionRepository> InteractionService<I> {
    pub fn new(repo: I) -> Self {
        Self { repo }
    }

    /// Interactions for a contact, newest first.
    pub async fn list_interactions(
        &self,
        contact_id: &ContactId,
    ) -> Result<Vec<Interaction>, ContactError> {
        Ok(self.repo.list_for_contact(contact_id).await?)
    }

    pub async fn get_interaction(&self, id: &InteractionId) -> Result<Interaction, ContactError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(ContactError::InteractionNotFound)
    }

    pub async fn update_interaction(
        &self,
        id: &InteractionId,
        request: UpdateInteractionRequest,
    ) -> Result<Interaction, ContactError> {
        let mut interaction = self.get_interaction(id).await?;

        if let Some(date) = request.date {
            interaction.date = date;
        }
        if let Some(kind) = request.kind {
            interaction.kind = kind.trim().to_string();
        }
        if let Some(notes) = request.notes {
            interaction.notes = notes;
        }

        self.repo.update(&interaction).await.map_err(not_found)
    }

    pub async fn delete_interaction(&self, id: &InteractionId) -> Result<(), ContactError> {
        self.repo.delete(id).await.map_err(not_found)
    }
}

fn not_found(err: RepositoryError) -> ContactError {
    match err {
        RepositoryError::NotFound => ContactError::InteractionNotFound,
        other => ContactError::StorageError(other.to_string()),
    }
}
