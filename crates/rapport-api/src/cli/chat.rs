//! `rapport import-chat`: summarize an exported chat into a contact's notes.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use rapport_core::enrichment::chat_log::split_into_chunks;

use super::resolve_contact;
use crate::state::AppState;

/// Steady-tick spinner with a message.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

pub async fn import_chat(state: &AppState, reference: &str, file: &Path, json: bool) -> Result<()> {
    let contact = resolve_contact(state, reference).await?;
    let provider = state.llm()?;

    let transcript = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    if transcript.trim().is_empty() {
        bail!("{} is empty", file.display());
    }

    let total = split_into_chunks(&transcript, state.config.chat_log.chunk_size).len();
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} chunks {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar.set_message(format!("for {}", contact.name));
    bar.enable_steady_tick(Duration::from_millis(120));

    let progress = bar.clone();
    let outcome = state
        .enrichment_service
        .import_chat_log(&provider, &contact.id, &transcript, move |p| {
            progress.set_position(p.completed as u64);
        })
        .await;
    bar.finish_and_clear();
    let outcome = outcome?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Summarized {} chunk(s) into {}'s notes",
        style("✓").green().bold(),
        outcome.chunks,
        style(&outcome.contact.name).cyan()
    );
    println!();
    for line in outcome.summary.lines().take(12) {
        println!("  {}", style(line).dim());
    }
    println!();
    Ok(())
}
