//! Third-party lookup ports and the field mapping of their results.
//!
//! Lookup results overwrite their target fields (`breaches`, `osint`,
//! `linkedin_*`) instead of going through the merge engine: each lookup is a
//! fresh snapshot of an external source.

use rapport_types::contact::{ContactFields, FieldValue};
use rapport_types::error::EnrichmentError;
use rapport_types::lookup::{BreachReport, Certification, ProfileSnapshot};
use serde_json::Value;

/// Breach database keyed by email address.
pub trait BreachDirectory: Send + Sync {
    fn breaches_for(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<BreachReport, EnrichmentError>> + Send;
}

/// Professional-profile lookup keyed by profile URL.
pub trait ProfileDirectory: Send + Sync {
    fn profile(
        &self,
        profile_url: &str,
    ) -> impl std::future::Future<Output = Result<ProfileSnapshot, EnrichmentError>> + Send;
}

/// OSINT aggregator keyed by email address. Returns the raw payload.
pub trait OsintDirectory: Send + Sync {
    fn search_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Value, EnrichmentError>> + Send;
}

/// Map a profile snapshot onto `linkedin_*` contact fields.
pub fn profile_to_fields(profile: &ProfileSnapshot) -> ContactFields {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    let json_list = |items: &[Value]| Value::Array(items.to_vec()).to_string();

    let certifications = match &profile.certifications {
        Some(certs) if !certs.is_empty() => format_certifications(certs),
        _ => "No certifications found".to_string(),
    };

    let inferred_salary = match &profile.inferred_salary {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    [
        ("linkedin_headline", text(&profile.headline)),
        ("linkedin_summary", text(&profile.summary)),
        ("linkedin_occupation", text(&profile.occupation)),
        ("linkedin_location", text(&profile.location)),
        ("linkedin_experience", json_list(&profile.experiences)),
        ("linkedin_education", json_list(&profile.education)),
        ("linkedin_skills", profile.skills.join(", ")),
        ("linkedin_certifications", certifications),
        ("linkedin_projects", json_list(&profile.projects)),
        ("linkedin_recommendations", json_list(&profile.recommendations)),
        ("linkedin_activities", json_list(&profile.activities)),
        ("linkedin_inferred_salary", inferred_salary),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), FieldValue::Text(value)))
    .collect()
}

/// Render certifications as a bulleted block, one entry per certification.
pub fn format_certifications(certifications: &[Certification]) -> String {
    certifications
        .iter()
        .map(|cert| {
            let date = cert
                .starts_at
                .and_then(|d| {
                    chrono::NaiveDate::from_ymd_opt(d.year?, d.month.unwrap_or(1), d.day.unwrap_or(1))
                })
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "unknown".to_string());
            format!(
                "• {name}\n  Issued by: {authority}\n  Date: {date}\n  URL: {url}",
                name = cert.name,
                authority = cert.authority.as_deref().unwrap_or("unknown"),
                url = cert.url.as_deref().unwrap_or(""),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Truncate oversized top-level values of an OSINT payload.
///
/// Strings longer than `max_string_len` characters and arrays longer than
/// `max_array_len` items are cut and marked. Nested values are left alone.
pub fn truncate_oversized(payload: Value, max_string_len: usize, max_array_len: usize) -> Value {
    const MARKER: &str = "... (truncated)";

    let Value::Object(map) = payload else {
        return payload;
    };

    let map = map
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) if s.chars().count() > max_string_len => {
                    let mut cut: String = s.chars().take(max_string_len).collect();
                    cut.push_str(MARKER);
                    Value::String(cut)
                }
                Value::Array(mut items) if items.len() > max_array_len => {
                    items.truncate(max_array_len);
                    items.push(Value::String(MARKER.to_string()));
                    Value::Array(items)
                }
                other => other,
            };
            (key, value)
        })
        .collect();

    Value::Object(map)
}
