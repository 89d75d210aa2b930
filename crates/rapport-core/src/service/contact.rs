//! Contact management service.
//!
//! Direct edits go through here and overwrite what they touch. Enrichment
//! writes go through [`super::enrichment::EnrichmentService`] instead.

use chrono::Utc;

use rapport_types::contact::{
    Contact, ContactFields, ContactId, CreateContactRequest, UpdateContactRequest,
};
use rapport_types::error::ContactError;

use crate::repository::contact::{ContactFilter, ContactRepository};

/// Keys that live outside the field map and cannot be set through it.
const RESERVED_FIELDS: &[&str] = &["id", "name", "starred", "user_id", "userId"];

pub struct ContactService<C: ContactRepository> {
    repo: C,
}

impl<C: ContactRepository> ContactService<C> {
    pub fn new(repo: C) -> Self {
        Self { repo }
    }

    pub async fn create_contact(&self, request: CreateContactRequest) -> Result<Contact, ContactError> {
        let name = validate_name(&request.name)?;
        validate_fields(&request.fields)?;

        let now = Utc::now();
        let contact = Contact {
            id: ContactId::new(),
            user_id: request.user_id,
            name,
            starred: false,
            fields: request.fields,
            created_at: now,
            updated_at: now,
        };

        let contact = self.repo.create(&contact).await?;
        tracing::info!(contact_id = %contact.id, "Contact created");
        Ok(contact)
    }

    pub async fn get_contact(&self, id: &ContactId) -> Result<Contact, ContactError> {
        self.repo.get_by_id(id).await?.ok_or(ContactError::NotFound)
    }

    /// List contacts, starred first, then by name.
    pub async fn list_contacts(
        &self,
        filter: Option<ContactFilter>,
    ) -> Result<Vec<Contact>, ContactError> {
        Ok(self.repo.list(filter).await?)
    }

    /// Apply a direct edit.
    ///
    /// Provided fields replace stored values; `clear_fields` removes entries.
    pub async fn update_contact(
        &self,
        id: &ContactId,
        request: UpdateContactRequest,
    ) -> Result<Contact, ContactError> {
        let mut contact = self.get_contact(id).await?;

        if let Some(name) = request.name {
            contact.name = validate_name(&name)?;
        }
        if let Some(starred) = request.starred {
            contact.starred = starred;
        }
        validate_fields(&request.fields)?;
        for name in &request.clear_fields {
            contact.fields.remove(name);
        }
        contact.fields.extend(request.fields);
        contact.updated_at = Utc::now();

        Ok(self.repo.update(&contact).await?)
    }

    pub async fn delete_contact(&self, id: &ContactId) -> Result<(), ContactError> {
        self.repo.delete(id).await?;
        tracing::info!(contact_id = %id, "Contact deleted");
        Ok(())
    }

    /// Flip the starred flag and return the updated contact.
    pub async fn toggle_star(&self, id: &ContactId) -> Result<Contact, ContactError> {
        let mut contact = self.get_contact(id).await?;
        contact.starred = !contact.starred;
        contact.updated_at = Utc::now();
        Ok(self.repo.update(&contact).await?)
    }
}

fn validate_name(name: &str) -> Result<String, ContactError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ContactError::InvalidName("name cannot be empty".to_string()));
    }
    Ok(name.to_string())
}

fn validate_fields(fields: &ContactFields) -> Result<(), ContactError> {
    for name in fields.keys() {
        if name.trim().is_empty() {
            return Err(ContactError::InvalidField {
                field: name.clone(),
                reason: "field name cannot be blank".to_string(),
            });
        }
        if RESERVED_FIELDS.contains(&name.as_str()) {
            return Err(ContactError::InvalidField {
                field: name.clone(),
                reason: "reserved; use the dedicated attribute".to_string(),
            });
        }
    }
    Ok(())
}
