//! In-memory test doubles for the core ports.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use rapport_types::contact::{Contact, ContactFields, ContactId};
use rapport_types::error::RepositoryError;
use rapport_types::interaction::{Interaction, InteractionId};
use rapport_types::llm::{CompletionRequest, CompletionResponse, LlmError, StopReason, Usage};
use rapport_types::reminder::{Reminder, ReminderId};

use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::provider::LlmProvider;
use crate::repository::contact::{ContactFilter, ContactRepository};
use crate::repository::interaction::InteractionRepository;
use crate::repository::reminder::{ReminderFilter, ReminderRepository};

pub type RecordedCalls = Arc<Mutex<Vec<CompletionRequest>>>;

/// Provider that answers with a fixed queue of replies and records requests.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: RecordedCalls,
}

impl ScriptedProvider {
    pub fn replying(replies: Vec<Result<String, LlmError>>) -> (BoxLlmProvider, RecordedCalls) {
        let calls = RecordedCalls::default();
        let provider = Self {
            replies: Mutex::new(replies.into()),
            calls: calls.clone(),
        };
        (BoxLlmProvider::new(provider), calls)
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(LlmError::Provider {
                message: "no scripted reply left".to_string(),
            })
        })?;
        Ok(CompletionResponse {
            id: format!("resp-{}", self.calls.lock().unwrap().len()),
            content: reply,
            model: request.model.clone(),
            stop_reason: StopReason::EndTurn,
            usage: Usage::default(),
        })
    }
}

#[derive(Clone, Default)]
pub struct InMemoryContacts {
    pub rows: Arc<Mutex<HashMap<ContactId, Contact>>>,
    pub field_writes: Arc<Mutex<Vec<ContactFields>>>,
}

impl InMemoryContacts {
    pub fn with(contacts: Vec<Contact>) -> Self {
        let repo = Self::default();
        for contact in contacts {
            repo.rows.lock().unwrap().insert(contact.id, contact);
        }
        repo
    }

    pub fn get(&self, id: &ContactId) -> Option<Contact> {
        self.rows.lock().unwrap().get(id).cloned()
    }
}

impl ContactRepository for InMemoryContacts {
    async fn create(&self, contact: &Contact) -> Result<Contact, RepositoryError> {
        self.rows.lock().unwrap().insert(contact.id, contact.clone());
        Ok(contact.clone())
    }

    async fn get_by_id(&self, id: &ContactId) -> Result<Option<Contact>, RepositoryError> {
        Ok(self.get(id))
    }

    async fn list(&self, filter: Option<ContactFilter>) -> Result<Vec<Contact>, RepositoryError> {
        let filter = filter.unwrap_or_default();
        let mut contacts: Vec<Contact> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|c| !filter.starred_only || c.starred)
            .cloned()
            .collect();
        contacts.sort_by(|a, b| b.starred.cmp(&a.starred).then(a.name.cmp(&b.name)));
        Ok(contacts)
    }

    async fn update(&self, contact: &Contact) -> Result<Contact, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.contains_key(&contact.id) {
            return Err(RepositoryError::NotFound);
        }
        rows.insert(contact.id, contact.clone());
        Ok(contact.clone())
    }

    async fn update_fields(
        &self,
        id: &ContactId,
        fields: &ContactFields,
    ) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let contact = rows.get_mut(id).ok_or(RepositoryError::NotFound)?;
        contact
            .fields
            .extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.field_writes.lock().unwrap().push(fields.clone());
        Ok(())
    }

    async fn delete(&self, id: &ContactId) -> Result<(), RepositoryError> {
        self.rows
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryInteractions {
    pub rows: Arc<Mutex<Vec<Interaction>>>,
}

impl InteractionRepository for InMemoryInteractions {
    async fn create(&self, interaction: &Interaction) -> Result<Interaction, RepositoryError> {
        self.rows.lock().unwrap().push(interaction.clone());
        Ok(interaction.clone())
    }

    async fn get_by_id(&self, id: &InteractionId) -> Result<Option<Interaction>, RepositoryError> {
        Ok(self.rows.lock().unwrap().iter().find(|i| i.id == *id).cloned())
    }

    async fn list_for_contact(
        &self,
        contact_id: &ContactId,
    ) -> Result<Vec<Interaction>, RepositoryError> {
        let mut items: Vec<Interaction> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.contact_id == *contact_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(items)
    }

    async fn update(&self, interaction: &Interaction) -> Result<Interaction, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|i| i.id == interaction.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = interaction.clone();
        Ok(interaction.clone())
    }

    async fn delete(&self, id: &InteractionId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|i| i.id != *id);
        if rows.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// Reminder store that can be told to reject specific titles.
#[derive(Clone, Default)]
pub struct InMemoryReminders {
    pub rows: Arc<Mutex<Vec<Reminder>>>,
    pub reject_titles: Arc<Mutex<Vec<String>>>,
}

impl InMemoryReminders {
    pub fn rejecting(titles: &[&str]) -> Self {
        let repo = Self::default();
        *repo.reject_titles.lock().unwrap() = titles.iter().map(|t| t.to_string()).collect();
        repo
    }
}

impl ReminderRepository for InMemoryReminders {
    async fn create(&self, reminder: &Reminder) -> Result<Reminder, RepositoryError> {
        if self.reject_titles.lock().unwrap().contains(&reminder.title) {
            return Err(RepositoryError::Query("write rejected".to_string()));
        }
        self.rows.lock().unwrap().push(reminder.clone());
        Ok(reminder.clone())
    }

    async fn get_by_id(&self, id: &ReminderId) -> Result<Option<Reminder>, RepositoryError> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == *id).cloned())
    }

    async fn list_for_contact(
        &self,
        contact_id: &ContactId,
    ) -> Result<Vec<Reminder>, RepositoryError> {
        let mut items: Vec<Reminder> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.contact_id == *contact_id)
            .cloned()
            .collect();
        items.sort_by_key(|r| r.date);
        Ok(items)
    }

    async fn list(&self, filter: Option<ReminderFilter>) -> Result<Vec<Reminder>, RepositoryError> {
        let filter = filter.unwrap_or_default();
        let mut items: Vec<Reminder> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| !filter.pending_only || !r.is_completed)
            .cloned()
            .collect();
        items.sort_by_key(|r| r.date);
        if let Some(limit) = filter.limit {
            items.truncate(limit.max(0) as usize);
        }
        Ok(items)
    }

    async fn update(&self, reminder: &Reminder) -> Result<Reminder, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|r| r.id == reminder.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = reminder.clone();
        Ok(reminder.clone())
    }

    async fn delete(&self, id: &ReminderId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != *id);
        if rows.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// A contact with the given detail fields and fixed timestamps.
pub fn sample_contact(name: &str, fields: &[(&str, &str)]) -> Contact {
    let now = chrono::Utc::now();
    Contact {
        id: ContactId::new(),
        user_id: None,
        name: name.to_string(),
        starred: false,
        fields: fields
            .iter()
            .map(|(k, v)| (k.to_string(), (*v).into()))
            .collect(),
        created_at: now,
        updated_at: now,
    }
}
