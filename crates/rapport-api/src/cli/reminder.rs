//! Reminder CLI commands: add, list, done.

use std::collections::HashMap;

use anyhow::{Result, anyhow};
use chrono::Local;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use rapport_core::repository::reminder::ReminderFilter;
use rapport_types::reminder::{CreateReminderRequest, ReminderId};

use super::resolve_contact;
use crate::state::AppState;

pub async fn add_reminder(
    state: &AppState,
    reference: &str,
    title: String,
    date: Option<String>,
    description: Option<String>,
    json: bool,
) -> Result<()> {
    let contact = resolve_contact(state, reference).await?;
    let reminder = state
        .reminder_service
        .create_reminder(
            &contact.id,
            CreateReminderRequest {
                title,
                description,
                date,
            },
        )
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reminder)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Reminder set for {} on {}",
        style("✓").green().bold(),
        style(&contact.name).cyan(),
        style(reminder.date).yellow()
    );
    println!("  {}", style(reminder.id.to_string()).dim());
    println!();
    Ok(())
}

/// Reminders across all contacts; overdue dates are shown in red.
pub async fn list_reminders(
    state: &AppState,
    include_completed: bool,
    limit: Option<i64>,
    json: bool,
) -> Result<()> {
    let reminders = state
        .reminder_service
        .list_reminders(Some(ReminderFilter {
            pending_only: !include_completed,
            limit,
        }))
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reminders)?);
        return Ok(());
    }

    if reminders.is_empty() {
        println!();
        println!("  {} Nothing to remember.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let names: HashMap<_, _> = state
        .contact_service
        .list_contacts(None)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let today = Local::now().date_naive();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Date").fg(Color::White),
        Cell::new("Contact").fg(Color::White),
        Cell::new("Title").fg(Color::White),
        Cell::new("Description").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ]);

    for reminder in &reminders {
        let date_color = if reminder.is_completed {
            Color::DarkGrey
        } else if reminder.date < today {
            Color::Red
        } else if reminder.date == today {
            Color::Yellow
        } else {
            Color::Green
        };
        let contact = names
            .get(&reminder.contact_id)
            .map(String::as_str)
            .unwrap_or("(deleted)");
        let title = if reminder.is_completed {
            format!("✓ {}", reminder.title)
        } else {
            reminder.title.clone()
        };
        table.add_row(vec![
            Cell::new(reminder.date).fg(date_color),
            Cell::new(contact).fg(Color::Cyan),
            Cell::new(title),
            Cell::new(&reminder.description),
            Cell::new(reminder.id.to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

pub async fn complete_reminder(state: &AppState, id: &str, undo: bool, json: bool) -> Result<()> {
    let id: ReminderId = id
        .trim()
        .parse()
        .map_err(|_| anyhow!("'{id}' is not a reminder ID"))?;
    let reminder = state
        .reminder_service
        .set_reminder_completed(&id, !undo)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reminder)?);
    } else if reminder.is_completed {
        println!("  {} Done: {}", style("✓").green().bold(), reminder.title);
    } else {
        println!("  {} Reopened: {}", style("↺").yellow(), reminder.title);
    }
    Ok(())
}
