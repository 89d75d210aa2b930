//! Query parameter extractors for list endpoints.

use serde::Deserialize;

/// Query parameters for the contact list endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct ContactListQuery {
    /// Only starred contacts.
    #[serde(default)]
    pub starred: bool,
    /// Maximum results.
    pub limit: Option<i64>,
    /// Offset for pagination.
    pub offset: Option<i64>,
}

/// Query parameters for the reminder list endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct ReminderListQuery {
    /// Exclude completed reminders.
    #[serde(default)]
    pub pending: bool,
    /// Maximum results.
    pub limit: Option<i64>,
}
