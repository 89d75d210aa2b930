//! CLI command definitions for the `rapport` binary.
//!
//! Uses clap derive macros for argument parsing. Commands are grouped by
//! noun (e.g., `rapport contact add`, `rapport reminder list`).

pub mod chat;
pub mod contact;
pub mod interaction;
pub mod reminder;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use rapport_types::contact::{Contact, ContactId, FieldValue};

use crate::state::AppState;

/// Keep track of the people in your life.
#[derive(Parser)]
#[command(name = "rapport", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Detailed output (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage contacts.
    Contact {
        #[command(subcommand)]
        command: ContactCommand,
    },

    /// Log and list interactions. Logging one also enriches the contact.
    Interaction {
        #[command(subcommand)]
        command: InteractionCommand,
    },

    /// Manage reminders.
    Reminder {
        #[command(subcommand)]
        command: ReminderCommand,
    },

    /// Summarize a chat export into a contact's notes.
    ImportChat {
        /// Contact name or ID.
        contact: String,
        /// Path to the exported chat transcript.
        file: std::path::PathBuf,
    },

    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to `[server].port`).
        #[arg(long, short)]
        port: Option<u16>,
        /// Host to bind to (defaults to `[server].host`).
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ContactCommand {
    /// Add a contact.
    Add {
        /// Display name (prompted for when omitted).
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Profile URL used by profile enrichment.
        #[arg(long)]
        linkedin: Option<String>,
        #[arg(long)]
        relationship: Option<String>,
        /// Extra field as key=value. Repeatable.
        #[arg(long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },

    /// List contacts, starred first.
    #[command(alias = "ls")]
    List {
        /// Only starred contacts.
        #[arg(long)]
        starred: bool,
    },

    /// Show a contact with recent interactions and pending reminders.
    Show {
        /// Contact name or ID.
        contact: String,
    },

    /// Delete a contact.
    #[command(alias = "rm")]
    Delete {
        /// Contact name or ID.
        contact: String,
        /// Skip confirmation prompt.
        #[arg(long, short)]
        force: bool,
    },

    /// Toggle the starred flag.
    Star {
        /// Contact name or ID.
        contact: String,
    },
}

#[derive(Subcommand)]
pub enum InteractionCommand {
    /// Record an interaction and enrich the contact from its notes.
    Add {
        /// Contact name or ID.
        contact: String,
        /// What happened (prompted for when omitted).
        #[arg(long, short)]
        notes: Option<String>,
        /// Kind of interaction, e.g. call, meeting, message.
        #[arg(long = "type", short = 't', default_value = "note")]
        kind: String,
        /// Date as YYYY-MM-DD (defaults to today).
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List a contact's interactions, newest first.
    #[command(alias = "ls")]
    List {
        /// Contact name or ID.
        contact: String,
    },
}

#[derive(Subcommand)]
pub enum ReminderCommand {
    /// Add a reminder for a contact.
    Add {
        /// Contact name or ID.
        contact: String,
        title: String,
        /// Date, e.g. 2025-03-01 or "01 Mar 2025" (defaults to today).
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// List reminders, soonest first.
    #[command(alias = "ls")]
    List {
        /// Include completed reminders.
        #[arg(long)]
        all: bool,
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Mark a reminder as done.
    Done {
        /// Reminder ID.
        id: String,
        /// Mark it as not done instead.
        #[arg(long)]
        undo: bool,
    },
}

/// Find a contact by ID, or by case-insensitive name.
pub async fn resolve_contact(state: &AppState, reference: &str) -> Result<Contact> {
    if let Ok(id) = reference.parse::<ContactId>() {
        return Ok(state.contact_service.get_contact(&id).await?);
    }

    let wanted = reference.trim().to_lowercase();
    let mut matches: Vec<Contact> = state
        .contact_service
        .list_contacts(None)
        .await?
        .into_iter()
        .filter(|c| c.name.to_lowercase() == wanted)
        .collect();

    match matches.len() {
        0 => bail!("No contact named '{reference}'"),
        1 => Ok(matches.remove(0)),
        n => bail!("{n} contacts are named '{reference}'; use the contact ID instead"),
    }
}

/// Single-line rendering of a field value for tables.
pub fn display_value(value: &FieldValue, max_len: usize) -> String {
    let text = value.to_text().replace('\n', " ");
    if text.chars().count() > max_len {
        let cut: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_interaction_add() {
        let cli = Cli::parse_from([
            "rapport", "interaction", "add", "Ada", "-n", "Coffee chat", "--type", "meeting",
            "--date", "2024-11-12",
        ]);
        match cli.command {
            Commands::Interaction {
                command: InteractionCommand::Add { contact, notes, kind, date },
            } => {
                assert_eq!(contact, "Ada");
                assert_eq!(notes.as_deref(), Some("Coffee chat"));
                assert_eq!(kind, "meeting");
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 11, 12));
            }
            _ => panic!("expected interaction add"),
        }
    }

    #[test]
    fn test_display_value_truncates() {
        let value = FieldValue::from("a".repeat(50));
        assert_eq!(display_value(&value, 10), "aaaaaaa...");
        let list = FieldValue::List(vec!["golf".to_string(), "chess".to_string()]);
        assert_eq!(display_value(&list, 40), "golf, chess");
    }
}
