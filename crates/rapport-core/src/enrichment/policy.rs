//! Per-field merge policy table.

use rapport_types::contact::fields;

/// How a candidate value combines with the stored value of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Never written by enrichment.
    Protected,
    /// Sequence field; union of stored and candidate items.
    ListUnion,
    /// Text holding a `", "`-separated set; new items are appended.
    DelimitedSet,
    /// Narrative notes; always appended with `"; "`.
    FreeformAppend,
    /// Adopt when empty, otherwise append with `"; "`.
    ScalarAppend,
}

const PROTECTED: &[&str] = &[
    "id",
    fields::NAME,
    "starred",
    fields::RELATIONSHIP,
    fields::GENDER,
    fields::EMAIL,
    fields::PHONE,
    "userId",
    "user_id",
];

const DELIMITED_SETS: &[&str] = &[
    "personality_traits",
    "friends",
    "enemies",
    "acquaintances",
    "family",
    "wants",
    "ambition",
    "dislikes",
    "commitments",
];

/// Look up the merge policy for a field name.
///
/// Unknown names fall through to [`MergePolicy::ScalarAppend`].
pub fn policy_for(field: &str) -> MergePolicy {
    if PROTECTED.contains(&field) {
        MergePolicy::Protected
    } else if field == fields::LIKES {
        MergePolicy::ListUnion
    } else if DELIMITED_SETS.contains(&field) {
        MergePolicy::DelimitedSet
    } else if field == fields::OTHER_INSIGHTS {
        MergePolicy::FreeformAppend
    } else {
        MergePolicy::ScalarAppend
    }
}
