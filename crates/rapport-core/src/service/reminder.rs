//! Reminder management service.
//!
//! Directly entered dates are validated: unlike model output, a user typo is
//! rejected instead of silently falling back to today.

use chrono::{Local, NaiveDate, Utc};

use rapport_types::contact::ContactId;
use rapport_types::error::{ContactError, RepositoryError};
use rapport_types::reminder::{
    CreateReminderRequest, Reminder, ReminderId, UpdateReminderRequest, parse_reminder_date,
};

use crate::repository::contact::ContactRepository;
use crate::repository::reminder::{ReminderFilter, ReminderRepository};

pub struct ReminderService<R: ReminderRepository, C: ContactRepository> {
    repo: R,
    contacts: C,
}

impl<R: ReminderRepository, C: ContactRepository> ReminderService<R, C> {
    pub fn new(repo: R, contacts: C) -> Self {
        Self { repo, contacts }
    }

    /// Create a reminder for an existing contact. The date defaults to today.
    pub async fn create_reminder(
        &self,
        contact_id: &ContactId,
        request: CreateReminderRequest,
    ) -> Result<Reminder, ContactError> {
        if self.contacts.get_by_id(contact_id).await?.is_none() {
            return Err(ContactError::NotFound);
        }

        let title = request.title.trim();
        if title.is_empty() {
            return Err(ContactError::InvalidField {
                field: "title".to_string(),
                reason: "title cannot be empty".to_string(),
            });
        }

        let date = match request.date.as_deref() {
            Some(raw) if !raw.trim().is_empty() => parse_date(raw)?,
            _ => Local::now().date_naive(),
        };
        let description = request
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| title.to_string());

        let reminder = Reminder {
            id: ReminderId::new(),
            contact_id: *contact_id,
            title: title.to_string(),
            description,
            date,
            is_completed: false,
            created_at: Utc::now(),
        };

        Ok(self.repo.create(&reminder).await?)
    }

    /// Reminders for one contact, soonest first.
    pub async fn list_reminders_for_contact(
        &self,
        contact_id: &ContactId,
    ) -> Result<Vec<Reminder>, ContactError> {
        Ok(self.repo.list_for_contact(contact_id).await?)
    }

    /// Reminders across all contacts, soonest first.
    pub async fn list_reminders(
        &self,
        filter: Option<ReminderFilter>,
    ) -> Result<Vec<Reminder>, ContactError> {
        Ok(self.repo.list(filter).await?)
    }

    pub async fn set_reminder_completed(
        &self,
        id: &ReminderId,
        completed: bool,
    ) -> Result<Reminder, ContactError> {
        self.update_reminder(
            id,
            UpdateReminderRequest {
                is_completed: Some(completed),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn update_reminder(
        &self,
        id: &ReminderId,
        request: UpdateReminderRequest,
    ) -> Result<Reminder, ContactError> {
        let mut reminder = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or(ContactError::ReminderNotFound)?;

        if let Some(title) = request.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(ContactError::InvalidField {
                    field: "title".to_string(),
                    reason: "title cannot be empty".to_string(),
                });
            }
            reminder.title = title.to_string();
        }
        if let Some(description) = request.description {
            reminder.description = description;
        }
        if let Some(date) = request.date {
            reminder.date = parse_date(&date)?;
        }
        if let Some(completed) = request.is_completed {
            reminder.is_completed = completed;
        }

        self.repo.update(&reminder).await.map_err(not_found)
    }

    pub async fn delete_reminder(&self, id: &ReminderId) -> Result<(), ContactError> {
        self.repo.delete(id).await.map_err(not_found)
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, ContactError> {
    parse_reminder_date(raw).ok_or_else(|| ContactError::InvalidField {
        field: "date".to_string(),
        reason: format!("unrecognized date '{}'", raw.trim()),
    })
}

fn not_found(err: RepositoryError) -> ContactError {
    match err {
        RepositoryError::NotFound => ContactError::ReminderNotFound,
        other => ContactError::StorageError(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryContacts, InMemoryReminders, sample_contact};

    fn setup() -> (
        ReminderService<InMemoryReminders, InMemoryContacts>,
        ContactId,
    ) {
        let contact = sample_contact("Maria", &[]);
        let id = contact.id;
        let service =
            ReminderService::new(InMemoryReminders::default(), InMemoryContacts::with(vec![contact]));
        (service, id)
    }

    fn request(title: &str, date: Option<&str>) -> CreateReminderRequest {
        CreateReminderRequest {
            title: title.to_string(),
            description: None,
            date: date.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_normalizes_date_and_description() {
        let (service, contact_id) = setup();
        let reminder = service
            .create_reminder(&contact_id, request("Birthday", Some("3 Feb 2025")))
            .await
            .unwrap();
        assert_eq!(reminder.date, NaiveDate::from_ymd_opt(2025, 2, 3).unwrap());
        assert_eq!(reminder.description, "Birthday");
        assert!(!reminder.is_completed);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let (service, contact_id) = setup();
        assert!(matches!(
            service
                .create_reminder(&contact_id, request("Birthday", Some("someday")))
                .await
                .unwrap_err(),
            ContactError::InvalidField { .. }
        ));
        assert!(matches!(
            service
                .create_reminder(&contact_id, request(" ", None))
                .await
                .unwrap_err(),
            ContactError::InvalidField { .. }
        ));
        assert!(matches!(
            service
                .create_reminder(&ContactId::new(), request("Birthday", None))
                .await
                .unwrap_err(),
            ContactError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_pending_list_is_date_ordered() {
        let (service, contact_id) = setup();
        let later = service
            .create_reminder(&contact_id, request("Later", Some("2025-06-01")))
            .await
            .unwrap();
        let done = service
            .create_reminder(&contact_id, request("Done", Some("2025-01-01")))
            .await
            .unwrap();
        service
            .create_reminder(&contact_id, request("Sooner", Some("2025-03-01")))
            .await
            .unwrap();
        service.set_reminder_completed(&done.id, true).await.unwrap();

        let pending = service
            .list_reminders(Some(ReminderFilter {
                pending_only: true,
                limit: None,
            }))
            .await
            .unwrap();
        let titles: Vec<&str> = pending.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Sooner", "Later"]);

        let all = service.list_reminders_for_contact(&contact_id).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].id, later.id);
    }

    #[tokio::test]
    async fn test_missing_reminder() {
        let (service, _) = setup();
        let id = ReminderId::new();
        assert!(matches!(
            service.set_reminder_completed(&id, true).await.unwrap_err(),
            ContactError::ReminderNotFound
        ));
        assert!(matches!(
            service.delete_reminder(&id).await.unwrap_err(),
            ContactError::ReminderNotFound
        ));
    }
}
