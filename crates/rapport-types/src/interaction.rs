//! Interaction types: logged events (calls, meetings, messages) with a contact.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::contact::ContactId;

/// Unique identifier for an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractionId(pub Uuid);

impl InteractionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for InteractionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InteractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InteractionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A logged event with a contact.
///
/// `contact_id` links by convention only; deleting the contact leaves the
/// interaction in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: InteractionId,
    pub contact_id: ContactId,
    pub date: NaiveDate,
    /// Free-text kind, e.g. "call", "coffee", "message".
    #[serde(rename = "type")]
    pub kind: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// Request to record a new interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInteraction {
    /// Defaults to today when omitted.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub notes: String,
}

/// Explicit edit of an existing interaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateInteractionRequest {
    pub date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_kind_serializes_as_type() {
        let interaction = Interaction {
            id: InteractionId::new(),
            contact_id: ContactId::new(),
            date: NaiveDate::from_ymd_opt(2024, 11, 12).unwrap(),
            kind: "call".to_string(),
            notes: "Talked about the trip".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&interaction).unwrap();
        assert_eq!(json["type"], "call");
        assert_eq!(json["date"], "2024-11-12");
    }

    #[test]
    fn test_new_interaction_defaults() {
        let req: NewInteraction = serde_json::from_str(r#"{"notes": "hi"}"#).unwrap();
        assert!(req.date.is_none());
        assert_eq!(req.kind, "");
    }
}
