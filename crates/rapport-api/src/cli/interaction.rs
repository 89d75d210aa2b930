//! Interaction CLI commands: add (with enrichment) and list.

use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Input;

use rapport_types::contact::FieldValue;
use rapport_types::interaction::NewInteraction;

use super::{display_value, resolve_contact};
use crate::cli::chat::spinner;
use crate::state::AppState;

/// Save an interaction, then merge what the model extracts into the contact.
pub async fn add_interaction(
    state: &AppState,
    reference: &str,
    notes: Option<String>,
    kind: String,
    date: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let contact = resolve_contact(state, reference).await?;
    let provider = state.llm()?;

    let notes = match notes {
        Some(n) => n,
        None => Input::<String>::new()
            .with_prompt(format!("What happened with {}?", contact.name))
            .interact_text()?,
    };

    let progress = spinner("Extracting details...");
    let recorded = state
        .enrichment_service
        .record_interaction(&provider, &contact.id, NewInteraction { date, kind, notes })
        .await;
    progress.finish_and_clear();
    let recorded = recorded?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recorded)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Interaction saved for {}",
        style("✓").green().bold(),
        style(&contact.name).cyan()
    );

    match (&recorded.enrichment, &recorded.enrichment_error) {
        (Some(outcome), _) => {
            if outcome.changed_fields.is_empty() {
                println!("  {}", style("No new details found.").dim());
            } else {
                println!(
                    "  {} Updated: {}",
                    style("•").dim(),
                    outcome.changed_fields.join(", ")
                );
            }
            for reminder in &outcome.reminders.created {
                println!(
                    "  {} Reminder: {} ({})",
                    style("⏰").bold(),
                    reminder.title,
                    style(reminder.date).yellow()
                );
            }
            if outcome.reminders.skipped > 0 {
                println!(
                    "  {}",
                    style(format!(
                        "{} untitled reminder suggestion(s) skipped",
                        outcome.reminders.skipped
                    ))
                    .dim()
                );
            }
            for failure in &outcome.reminders.failed {
                println!(
                    "  {} Reminder '{}' not saved: {}",
                    style("!").red().bold(),
                    failure.title,
                    failure.error
                );
            }
        }
        (None, Some(error)) => {
            println!(
                "  {} Enrichment failed: {}",
                style("!").yellow().bold(),
                error
            );
        }
        (None, None) => {}
    }
    println!();
    Ok(())
}

pub async fn list_interactions(state: &AppState, reference: &str, json: bool) -> Result<()> {
    let contact = resolve_contact(state, reference).await?;
    let interactions = state
        .interaction_service
        .list_interactions(&contact.id)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&interactions)?);
        return Ok(());
    }

    if interactions.is_empty() {
        println!();
        println!(
            "  {} No interactions with {} yet.",
            style("i").blue().bold(),
            contact.name
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Date").fg(Color::White),
        Cell::new("Type").fg(Color::White),
        Cell::new("Notes").fg(Color::White),
    ]);
    for interaction in &interactions {
        table.add_row(vec![
            Cell::new(interaction.date).fg(Color::DarkGrey),
            Cell::new(&interaction.kind).fg(Color::Magenta),
            Cell::new(display_value(
                &FieldValue::from(interaction.notes.as_str()),
                100,
            )),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}
