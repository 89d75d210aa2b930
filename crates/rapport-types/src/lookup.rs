//! Payloads returned by the third-party lookup services.

use serde::{Deserialize, Deserializer, Serialize};

/// Outcome of a breach-database lookup for one email address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreachReport {
    /// Breach names, in the order the service returned them.
    pub breaches: Vec<String>,
}

impl BreachReport {
    pub const NONE_FOUND: &'static str = "No breaches found";

    /// Text stored in the contact's `breaches` field.
    pub fn summary(&self) -> String {
        if self.breaches.is_empty() {
            Self::NONE_FOUND.to_string()
        } else {
            self.breaches.join(", ")
        }
    }
}

/// Subset of a professional profile the enrichment keeps.
///
/// Every key is optional on the wire; list-valued sections default to empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experiences: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default)]
    pub certifications: Option<Vec<Certification>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommendations: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub activities: Vec<serde_json::Value>,
    /// Usually an object with `min`/`max`; kept loose.
    #[serde(default)]
    pub inferred_salary: Option<serde_json::Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Certification {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub authority: Option<String>,
    #[serde(default)]
    pub starts_at: Option<ProfileDate>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ProfileDate {
    pub day: Option<u32>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}
