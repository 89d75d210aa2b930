//! Reminder types and date normalization.
//!
//! Reminder dates arrive in two shapes: `YYYY-MM-DD` from direct entry and
//! `DD MMM YYYY` from the extraction prompt. Both are normalized to a
//! [`NaiveDate`] at the boundary so date ordering is reliable.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::contact::ContactId;

/// Accepted textual date layouts, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d/%m/%Y",
];

/// Unique identifier for a reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderId(pub Uuid);

impl ReminderId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ReminderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReminderId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A scheduled follow-up with a contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ReminderId,
    pub contact_id: ContactId,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Request to create a reminder directly (not via extraction).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReminderRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Any accepted date layout; defaults to today.
    #[serde(default)]
    pub date: Option<String>,
}

/// Explicit edit of an existing reminder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateReminderRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub is_completed: Option<bool>,
}

/// Parse a human-entered reminder date.
///
/// Accepts ISO dates, RFC 3339 timestamps (date part kept), and the
/// day-month-name layouts the extraction model produces. Returns `None` for
/// blank or unrecognized input.
pub fn parse_reminder_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Some(date);
        }
    }

    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|dt| dt.date_naive())
}
