//! Reminder repository trait definition.

use rapport_types::contact::ContactId;
use rapport_types::error::RepositoryError;
use rapport_types::reminder::{Reminder, ReminderId};

/// Filter criteria for listing reminders across all contacts.
#[derive(Debug, Clone, Default)]
pub struct ReminderFilter {
    /// Exclude completed reminders.
    pub pending_only: bool,
    pub limit: Option<i64>,
}

/// Repository trait for reminder persistence.
///
/// List methods order by date ascending (soonest first).
pub trait ReminderRepository: Send + Sync {
    fn create(
        &self,
        reminder: &Reminder,
    ) -> impl std::future::Future<Output = Result<Reminder, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &ReminderId,
    ) -> impl std::future::Future<Output = Result<Option<Reminder>, RepositoryError>> + Send;

    fn list_for_contact(
        &self,
        contact_id: &ContactId,
    ) -> impl std::future::Future<Output = Result<Vec<Reminder>, RepositoryError>> + Send;

    fn list(
        &self,
        filter: Option<ReminderFilter>,
    ) -> impl std::future::Future<Output = Result<Vec<Reminder>, RepositoryError>> + Send;

    fn update(
        &self,
        reminder: &Reminder,
    ) -> impl std::future::Future<Output = Result<Reminder, RepositoryError>> + Send;

    fn delete(
        &self,
        id: &ReminderId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
