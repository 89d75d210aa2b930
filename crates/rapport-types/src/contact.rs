use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Well-known contact field names.
///
/// Field names follow the stored document schema, so `otherInsights` keeps
/// its camelCase spelling while the rest are snake_case.
pub mod fields {
    pub const NAME: &str = "name";
    pub const RELATIONSHIP: &str = "relationship";
    pub const GENDER: &str = "gender";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const LINKEDIN: &str = "linkedin";
    pub const LIKES: &str = "likes";
    pub const OTHER_INSIGHTS: &str = "otherInsights";
    pub const BREACHES: &str = "breaches";
    pub const OSINT: &str = "osint";
}

/// Fields the extraction prompt asks the model to fill in.
pub const EXTRACTABLE_FIELDS: &[&str] = &[
    "likes",
    "job_title",
    "company",
    "religion",
    "education",
    "phone_model",
    "computer_model",
    "personality_traits",
    "friends",
    "enemies",
    "acquaintances",
    "family",
    "wants",
    "ambition",
    "dislikes",
    "house",
    "car",
    "income",
    "commitments",
    "otherInsights",
];

/// Unique identifier for a contact, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub Uuid);

impl ContactId {
    /// Create a new ContactId using UUID v7.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create a ContactId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ContactId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContactId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Value stored under a contact field.
///
/// Almost every field is free text; `likes` is the one sequence-valued field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// True when the value carries no information (blank text, or a list of
    /// blank items).
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.iter().all(|i| i.trim().is_empty()),
        }
    }

    /// Convert a loosely-typed JSON value into a field value.
    ///
    /// `null` maps to `None`. Numbers and booleans are stringified, arrays keep
    /// their scalar items, and nested objects are kept as JSON text.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;

        match value {
            Value::Null => None,
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            Value::Bool(b) => Some(FieldValue::Text(b.to_string())),
            Value::Number(n) => Some(FieldValue::Text(n.to_string())),
            Value::Array(items) => Some(FieldValue::List(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.clone()),
                        Value::Bool(b) => Some(b.to_string()),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .collect(),
            )),
            Value::Object(_) => Some(FieldValue::Text(value.to_string())),
        }
    }

    /// Render the value as display text (lists are joined with ", ").
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items.join(", "),
        }
    }

    /// Consume the value as a list of non-blank items.
    pub fn into_items(self) -> Vec<String> {
        match self {
            FieldValue::Text(s) if s.trim().is_empty() => Vec::new(),
            FieldValue::Text(s) => vec![s],
            FieldValue::List(items) => items
                .into_iter()
                .filter(|i| !i.trim().is_empty())
                .collect(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

/// Detail fields of a contact, keyed by field name.
pub type ContactFields = BTreeMap<String, FieldValue>;

/// A person the user keeps track of.
///
/// `name` and `user_id` live outside the field map so that no field-level
/// write can reach them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    /// Owner of the record (single-user deployments leave this unset).
    pub user_id: Option<String>,
    pub name: String,
    pub starred: bool,
    /// Everything else: job_title, likes, otherInsights, linkedin_*, ...
    #[serde(default)]
    pub fields: ContactFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// Look up a detail field.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Look up a detail field as non-blank text.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(FieldValue::Text(s)) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Request to create a new contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContactRequest {
    pub name: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub fields: ContactFields,
}

/// Request to edit a contact directly.
///
/// Direct edits overwrite: provided fields replace the stored values and
/// `clear_fields` removes entries outright.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateContactRequest {
    pub name: Option<String>,
    pub starred: Option<bool>,
    #[serde(default)]
    pub fields: ContactFields,
    #[serde(default)]
    pub clear_fields: Vec<String>,
}
