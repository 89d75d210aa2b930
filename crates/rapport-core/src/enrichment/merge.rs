//! Field merge engine.
//!
//! Folds extraction candidates into a contact record according to the
//! per-field [`MergePolicy`]. Merging is pure: it computes the next record in
//! memory and reports which fields changed, and the caller persists exactly
//! those fields in one write.
//!
//! Once a non-protected field holds content, no merge removes it: text
//! fields only grow by appending, and list fields only gain items.

use std::collections::BTreeSet;

use rapport_types::contact::{Contact, ContactFields, FieldValue};

use super::policy::{MergePolicy, policy_for};

const APPEND_SEPARATOR: &str = "; ";
const SET_SEPARATOR: &str = ", ";

/// Result of merging candidates into a contact.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The complete next record.
    pub contact: Contact,
    /// Names of fields whose value differs from the input record.
    pub changed: BTreeSet<String>,
}

impl MergeOutcome {
    /// Only the changed fields, ready for a partial update.
    pub fn changed_fields(&self) -> ContactFields {
        self.changed
            .iter()
            .filter_map(|name| {
                self.contact
                    .fields
                    .get(name)
                    .map(|value| (name.clone(), value.clone()))
            })
            .collect()
    }

    pub fn is_unchanged(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Merge candidate field values into `current`.
///
/// Empty candidates and protected fields are skipped. A candidate that
/// leaves the stored value as it was is not reported as changed.
pub fn merge_fields(current: &Contact, candidates: &ContactFields) -> MergeOutcome {
    let mut contact = current.clone();
    let mut changed = BTreeSet::new();

    for (name, candidate) in candidates {
        if candidate.is_empty() {
            continue;
        }

        let existing = contact.fields.get(name);
        let merged = match policy_for(name) {
            MergePolicy::Protected => None,
            MergePolicy::ListUnion => union_items(existing, candidate),
            MergePolicy::DelimitedSet => extend_delimited(existing, candidate),
            MergePolicy::FreeformAppend | MergePolicy::ScalarAppend => {
                append_text(existing, candidate)
            }
        };

        if let Some(value) = merged {
            if contact.fields.get(name) != Some(&value) {
                contact.fields.insert(name.clone(), value);
                changed.insert(name.clone());
            }
        }
    }

    MergeOutcome { contact, changed }
}

fn contains_item(items: &[String], item: &str) -> bool {
    items.iter().any(|existing| existing.eq_ignore_ascii_case(item))
}

/// `likes`: stored items (deduplicated, order kept) followed by new candidate items.
fn union_items(existing: Option<&FieldValue>, candidate: &FieldValue) -> Option<FieldValue> {
    let mut items: Vec<String> = Vec::new();
    let stored = existing.cloned().map(FieldValue::into_items).unwrap_or_default();
    let incoming = candidate.clone().into_items();

    for item in stored.into_iter().chain(incoming) {
        let item = item.trim();
        if !contains_item(&items, item) {
            items.push(item.to_string());
        }
    }

    Some(FieldValue::List(items))
}

/// Delimited-set text: append candidate items not already present.
fn extend_delimited(existing: Option<&FieldValue>, candidate: &FieldValue) -> Option<FieldValue> {
    let current = existing.map(FieldValue::to_text).unwrap_or_default();
    let current = current.trim_end();
    let stored: Vec<String> = split_set(current);

    let incoming: Vec<String> = match candidate {
        FieldValue::Text(text) => split_set(text),
        FieldValue::List(items) => items
            .iter()
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .collect(),
    };

    let mut added: Vec<String> = Vec::new();
    for item in incoming {
        if !contains_item(&stored, &item) && !contains_item(&added, &item) {
            added.push(item);
        }
    }

    if added.is_empty() {
        return None;
    }

    let joined = added.join(SET_SEPARATOR);
    if current.trim().is_empty() {
        Some(FieldValue::Text(joined))
    } else {
        Some(FieldValue::Text(format!("{current}{SET_SEPARATOR}{joined}")))
    }
}

fn split_set(text: &str) -> Vec<String> {
    text.split(SET_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Append-only text: adopt when empty, else `current; candidate`.
fn append_text(existing: Option<&FieldValue>, candidate: &FieldValue) -> Option<FieldValue> {
    let addition = candidate.to_text();
    let addition = addition.trim();
    let current = existing.map(FieldValue::to_text).unwrap_or_default();

    if current.trim().is_empty() {
        return Some(FieldValue::Text(addition.to_string()));
    }

    Some(FieldValue::Text(format!(
        "{current}{APPEND_SEPARATOR}{addition}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rapport_types::contact::{ContactId, fields};

    fn contact_with(entries: &[(&str, FieldValue)]) -> Contact {
        let now = Utc::now();
        Contact {
            id: ContactId::new(),
            user_id: Some("user-1".to_string()),
            name: "Maria".to_string(),
            starred: false,
            fields: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            created_at: now,
            updated_at: now,
        }
    }

    fn candidates(entries: &[(&str, FieldValue)]) -> ContactFields {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn list(items: &[&str]) -> FieldValue {
        FieldValue::List(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_likes_union_example() {
        let current = contact_with(&[(fields::LIKES, list(&["hiking"]))]);
        let outcome = merge_fields(
            &current,
            &candidates(&[(fields::LIKES, list(&["hiking", "travel"]))]),
        );

        assert_eq!(
            outcome.contact.field(fields::LIKES),
            Some(&list(&["hiking", "travel"]))
        );
        assert!(outcome.changed.contains(fields::LIKES));
    }

    #[test]
    fn test_other_insights_append_example() {
        let current = contact_with(&[(fields::OTHER_INSIGHTS, "Likes golf".into())]);
        let outcome = merge_fields(
            &current,
            &candidates(&[(fields::OTHER_INSIGHTS, "Planning a trip".into())]),
        );

        assert_eq!(
            outcome.contact.text(fields::OTHER_INSIGHTS),
            Some("Likes golf; Planning a trip")
        );
    }

    #[test]
    fn test_protected_fields_never_change() {
        let current = contact_with(&[
            (fields::EMAIL, "maria@example.com".into()),
            (fields::PHONE, "".into()),
            (fields::RELATIONSHIP, "friend".into()),
        ]);
        let outcome = merge_fields(
            &current,
            &candidates(&[
                (fields::NAME, "Someone Else".into()),
                (fields::EMAIL, "other@example.com".into()),
                (fields::PHONE, "+44 7700 900000".into()),
                (fields::RELATIONSHIP, "enemy".into()),
                (fields::GENDER, "female".into()),
                ("userId", "intruder".into()),
            ]),
        );

        assert_eq!(outcome.contact.name, "Maria");
        assert_eq!(outcome.contact.user_id.as_deref(), Some("user-1"));
        assert_eq!(outcome.contact.fields, current.fields);
        assert!(outcome.is_unchanged());
    }

    #[test]
    fn test_append_only_keeps_prior_content() {
        let prior = [
            ("job_title", "Engineer"),
            ("friends", "Ana, Ben"),
            (fields::OTHER_INSIGHTS, "Has a dog"),
            ("car", "Civic"),
        ];
        let current = contact_with(
            &prior
                .iter()
                .map(|(k, v)| (*k, FieldValue::from(*v)))
                .collect::<Vec<_>>(),
        );
        let outcome = merge_fields(
            &current,
            &candidates(&[
                ("job_title", "Manager".into()),
                ("friends", "Ben, Carla".into()),
                (fields::OTHER_INSIGHTS, "Moved to Leeds".into()),
                ("car", "".into()),
            ]),
        );

        for (name, before) in prior {
            let after = outcome.contact.text(name).unwrap();
            assert!(after.contains(before), "{name}: {after:?} lost {before:?}");
        }
        assert_eq!(outcome.contact.text("job_title"), Some("Engineer; Manager"));
        assert_eq!(outcome.contact.text("friends"), Some("Ana, Ben, Carla"));
        assert_eq!(outcome.contact.text("car"), Some("Civic"));
        assert!(!outcome.changed.contains("car"));
    }

    #[test]
    fn test_likes_union_is_idempotent() {
        let current = contact_with(&[(fields::LIKES, list(&["hiking"]))]);
        let update = candidates(&[(fields::LIKES, list(&["travel", "hiking", "travel"]))]);

        let once = merge_fields(&current, &update);
        let twice = merge_fields(&once.contact, &update);

        assert_eq!(once.contact.fields, twice.contact.fields);
        assert!(twice.is_unchanged());
        assert_eq!(
            once.contact.field(fields::LIKES),
            Some(&list(&["hiking", "travel"]))
        );
    }

    #[test]
    fn test_scalar_likes_candidate_is_wrapped() {
        let current = contact_with(&[]);
        let outcome = merge_fields(&current, &candidates(&[(fields::LIKES, "chess".into())]));
        assert_eq!(outcome.contact.field(fields::LIKES), Some(&list(&["chess"])));
    }

    #[test]
    fn test_empty_field_adopts_candidate() {
        let current = contact_with(&[("company", "".into())]);
        let outcome = merge_fields(&current, &candidates(&[("company", "Acme".into())]));
        assert_eq!(outcome.contact.text("company"), Some("Acme"));
        assert!(outcome.changed.contains("company"));
    }

    #[test]
    fn test_empty_candidates_are_ignored() {
        let current = contact_with(&[(fields::LIKES, list(&["golf"]))]);
        let outcome = merge_fields(
            &current,
            &candidates(&[
                (fields::LIKES, list(&[])),
                ("job_title", "".into()),
                ("family", list(&["  "])),
            ]),
        );
        assert!(outcome.is_unchanged());
        assert!(!outcome.contact.fields.contains_key("job_title"));
    }

    #[test]
    fn test_unknown_field_is_stored() {
        let current = contact_with(&[]);
        let outcome = merge_fields(
            &current,
            &candidates(&[("favourite_team", "Arsenal".into())]),
        );
        assert_eq!(outcome.contact.text("favourite_team"), Some("Arsenal"));
        assert_eq!(
            outcome.changed_fields().get("favourite_team"),
            Some(&FieldValue::from("Arsenal"))
        );
    }

    #[test]
    fn test_delimited_set_dedupes_case_insensitively() {
        let current = contact_with(&[("dislikes", "Mushrooms, Traffic".into())]);
        let outcome = merge_fields(
            &current,
            &candidates(&[("dislikes", list(&["traffic", "Rain"]))]),
        );
        assert_eq!(
            outcome.contact.text("dislikes"),
            Some("Mushrooms, Traffic, Rain")
        );
    }

    #[test]
    fn test_restated_text_is_still_appended() {
        let current = contact_with(&[
            (fields::OTHER_INSIGHTS, "Likes golf; Has twins".into()),
            ("company", "Acme".into()),
        ]);
        let outcome = merge_fields(
            &current,
            &candidates(&[
                (fields::OTHER_INSIGHTS, "Has twins".into()),
                ("company", "Acme".into()),
            ]),
        );

        assert_eq!(
            outcome.contact.text(fields::OTHER_INSIGHTS),
            Some("Likes golf; Has twins; Has twins")
        );
        assert_eq!(outcome.contact.text("company"), Some("Acme; Acme"));
        assert_eq!(
            outcome.changed.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["company", fields::OTHER_INSIGHTS]
        );
    }

    #[test]
    fn test_changed_fields_only_lists_changes() {
        let current = contact_with(&[
            ("company", "Acme".into()),
            ("friends", "Ana, Ben".into()),
        ]);
        let outcome = merge_fields(
            &current,
            &candidates(&[
                ("company", "".into()),
                ("friends", "ben".into()),
                ("education", "MIT".into()),
            ]),
        );
        let changed = outcome.changed_fields();
        assert_eq!(changed.len(), 1);
        assert!(changed.contains_key("education"));
    }

    #[test]
    fn test_record_keys_are_never_written() {
        let current = contact_with(&[]);
        let outcome = merge_fields(
            &current,
            &candidates(&[
                ("starred", "true".into()),
                ("id", "x".into()),
                ("user_id", "intruder".into()),
            ]),
        );
        assert!(outcome.is_unchanged());
        assert!(!outcome.contact.starred);
        assert!(outcome.contact.fields.is_empty());
    }
}
