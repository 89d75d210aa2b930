//! Reminder materializer: candidate reminders -> persisted reminders.
//!
//! Every valid candidate is written independently and concurrently; one
//! failed write never blocks its siblings. Titleless candidates are skipped
//! and counted.

use chrono::{NaiveDate, Utc};
use futures_util::future::join_all;
use serde::Serialize;

use rapport_types::contact::ContactId;
use rapport_types::extraction::CandidateReminder;
use rapport_types::reminder::{Reminder, ReminderId, parse_reminder_date};

use crate::repository::reminder::ReminderRepository;

/// Outcome of materializing one batch of candidates.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MaterializeReport {
    pub created: Vec<Reminder>,
    /// Candidates dropped for having no title.
    pub skipped: usize,
    pub failed: Vec<MaterializeFailure>,
}

/// A candidate whose write was rejected by the store.
#[derive(Debug, Clone, Serialize)]
pub struct MaterializeFailure {
    pub title: String,
    pub error: String,
}

/// Build the reminder a candidate describes, or `None` when it has no title.
///
/// The date falls back to `today` when missing or unparseable; unparseable
/// text is kept at the end of the description.
pub fn build_reminder(
    contact_id: &ContactId,
    candidate: &CandidateReminder,
    today: NaiveDate,
) -> Option<Reminder> {
    let title = candidate.title()?;

    let mut description = match candidate.description.trim() {
        "" => title.to_string(),
        text => text.to_string(),
    };

    let raw_date = candidate.date.trim();
    let date = match parse_reminder_date(raw_date) {
        Some(date) => date,
        None => {
            if !raw_date.is_empty() {
                description.push_str(&format!(" (date: {raw_date})"));
            }
            today
        }
    };

    Some(Reminder {
        id: ReminderId::new(),
        contact_id: *contact_id,
        title: title.to_string(),
        description,
        date,
        is_completed: false,
        created_at: Utc::now(),
    })
}

/// Persists candidate reminders for one contact.
pub struct ReminderMaterializer;

impl ReminderMaterializer {
    #[tracing::instrument(
        name = "materialize_reminders",
        skip(repo, candidates),
        fields(contact_id = %contact_id, candidates = candidates.len())
    )]
    pub async fn materialize<R: ReminderRepository>(
        repo: &R,
        contact_id: &ContactId,
        candidates: &[CandidateReminder],
        today: NaiveDate,
    ) -> MaterializeReport {
        let mut report = MaterializeReport::default();

        let reminders: Vec<Reminder> = candidates
            .iter()
            .filter_map(|candidate| {
                let built = build_reminder(contact_id, candidate, today);
                if built.is_none() {
                    report.skipped += 1;
                }
                built
            })
            .collect();

        let results = join_all(reminders.iter().map(|reminder| repo.create(reminder))).await;

        for (reminder, result) in reminders.iter().zip(results) {
            match result {
                Ok(saved) => report.created.push(saved),
                Err(e) => {
                    tracing::warn!(
                        title = %reminder.title,
                        error = %e,
                        "Failed to persist reminder"
                    );
                    report.failed.push(MaterializeFailure {
                        title: reminder.title.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        if report.skipped > 0 {
            tracing::debug!(skipped = report.skipped, "Skipped titleless reminder candidates");
        }

        report
    }
}
