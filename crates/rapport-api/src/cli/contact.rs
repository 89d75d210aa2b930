//! Contact CLI commands: add, list, show, delete, star.

use anyhow::{Result, anyhow};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::{Confirm, Input};

use rapport_core::repository::contact::ContactFilter;
use rapport_types::contact::{ContactFields, CreateContactRequest, FieldValue, fields};

use super::{display_value, resolve_contact};
use crate::state::AppState;

/// Add a contact from flags, prompting for the name when it is missing.
///
/// # Examples
///
/// ```bash
/// rapport contact add "Ada Lovelace" --email ada@example.com --field company=Analytical
/// ```
pub async fn add_contact(
    state: &AppState,
    name: Option<String>,
    known: [(&str, Option<String>); 4],
    extra: &[String],
    json: bool,
) -> Result<()> {
    let name = match name {
        Some(n) => n,
        None => Input::<String>::new()
            .with_prompt("Contact name")
            .interact_text()?,
    };

    let mut contact_fields = ContactFields::new();
    for (key, value) in known {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            contact_fields.insert(key.to_string(), FieldValue::Text(value));
        }
    }
    for pair in extra {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{pair}'"))?;
        contact_fields.insert(key.trim().to_string(), FieldValue::from(value.trim()));
    }

    let contact = state
        .contact_service
        .create_contact(CreateContactRequest {
            name,
            user_id: None,
            fields: contact_fields,
        })
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&contact)?);
        return Ok(());
    }

    println!();
    println!("  {} Contact added!", style("✓").green().bold());
    println!();
    println!("  {}  {}", style("Name:").bold(), style(&contact.name).cyan());
    println!("  {}    {}", style("ID:").bold(), style(contact.id.to_string()).dim());
    println!();
    println!(
        "  Log an interaction: {}",
        style(format!("rapport interaction add \"{}\" -n \"...\"", contact.name)).yellow()
    );
    println!();
    Ok(())
}

/// The four known fields, in `add_contact` order.
pub fn known_fields(
    email: Option<String>,
    phone: Option<String>,
    linkedin: Option<String>,
    relationship: Option<String>,
) -> [(&'static str, Option<String>); 4] {
    [
        (fields::EMAIL, email),
        (fields::PHONE, phone),
        (fields::LINKEDIN, linkedin),
        (fields::RELATIONSHIP, relationship),
    ]
}

/// List contacts in a table.
pub async fn list_contacts(state: &AppState, starred_only: bool, json: bool) -> Result<()> {
    let contacts = state
        .contact_service
        .list_contacts(Some(ContactFilter {
            starred_only,
            ..Default::default()
        }))
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&contacts)?);
        return Ok(());
    }

    if contacts.is_empty() {
        println!();
        println!(
            "  {} No contacts yet. Add one with: {}",
            style("i").blue().bold(),
            style("rapport contact add").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Email").fg(Color::White),
        Cell::new("Phone").fg(Color::White),
        Cell::new("Relationship").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
    ]);

    for contact in &contacts {
        let star = if contact.starred {
            Cell::new("★").fg(Color::Yellow)
        } else {
            Cell::new("")
        };
        table.add_row(vec![
            star,
            Cell::new(&contact.name).fg(Color::Cyan),
            Cell::new(contact.text(fields::EMAIL).unwrap_or("")),
            Cell::new(contact.text(fields::PHONE).unwrap_or("")),
            Cell::new(contact.text(fields::RELATIONSHIP).unwrap_or("")),
            Cell::new(contact.updated_at.format("%Y-%m-%d").to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!("  {} contact(s)", style(contacts.len()).bold());
    println!();
    Ok(())
}

/// Show one contact: fields, latest interactions, pending reminders.
pub async fn show_contact(state: &AppState, reference: &str, json: bool) -> Result<()> {
    let contact = resolve_contact(state, reference).await?;
    let interactions = state
        .interaction_service
        .list_interactions(&contact.id)
        .await?;
    let reminders: Vec<_> = state
        .reminder_service
        .list_reminders_for_contact(&contact.id)
        .await?
        .into_iter()
        .filter(|r| !r.is_completed)
        .collect();

    if json {
        let detail = serde_json::json!({
            "contact": contact,
            "interactions": interactions,
            "reminders": reminders,
        });
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    println!();
    let star = if contact.starred { " ★" } else { "" };
    println!(
        "  {}{}",
        style(&contact.name).cyan().bold(),
        style(star).yellow()
    );
    println!("  {}", style(contact.id.to_string()).dim());
    println!();

    if contact.fields.is_empty() {
        println!("  {}", style("No details recorded yet.").dim());
    } else {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL_CONDENSED);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Cell::new("Field").fg(Color::White),
            Cell::new("Value").fg(Color::White),
        ]);
        for (name, value) in &contact.fields {
            if value.is_empty() {
                continue;
            }
            table.add_row(vec![
                Cell::new(name).fg(Color::Cyan),
                Cell::new(display_value(value, 120)),
            ]);
        }
        println!("{table}");
    }

    if !interactions.is_empty() {
        println!();
        println!("  {}", style("Recent interactions").bold());
        for interaction in interactions.iter().take(5) {
            let notes = display_value(&FieldValue::from(interaction.notes.as_str()), 80);
            println!(
                "    {} {} {}",
                style(interaction.date).dim(),
                style(&interaction.kind).magenta(),
                notes
            );
        }
    }

    if !reminders.is_empty() {
        println!();
        println!("  {}", style("Pending reminders").bold());
        for reminder in &reminders {
            println!(
                "    {} {} {}",
                style(reminder.date).yellow(),
                reminder.title,
                style(reminder.id.to_string()).dim()
            );
        }
    }
    println!();
    Ok(())
}

/// Delete a contact after confirmation. Interactions and reminders stay.
pub async fn delete_contact(
    state: &AppState,
    reference: &str,
    force: bool,
    json: bool,
) -> Result<()> {
    let contact = resolve_contact(state, reference).await?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete contact '{}'? This cannot be undone",
                contact.name
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    state.contact_service.delete_contact(&contact.id).await?;

    if json {
        let out = serde_json::json!({ "deleted": true, "id": contact.id });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!();
        println!(
            "  {} Contact '{}' deleted.",
            style("✓").green().bold(),
            contact.name
        );
        println!();
    }
    Ok(())
}

pub async fn toggle_star(state: &AppState, reference: &str, json: bool) -> Result<()> {
    let contact = resolve_contact(state, reference).await?;
    let contact = state.contact_service.toggle_star(&contact.id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&contact)?);
    } else if contact.starred {
        println!("  {} Starred {}", style("★").yellow(), style(&contact.name).cyan());
    } else {
        println!("  {} Unstarred {}", style("☆").dim(), style(&contact.name).cyan());
    }
    Ok(())
}
