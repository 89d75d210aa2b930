//! Rapport CLI and REST API entry point.
//!
//! Binary name: `rapport`
//!
//! Parses CLI arguments, initializes database and services, then dispatches
//! to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands, ContactCommand, InteractionCommand, ReminderCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need tracing or app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "rapport", &mut std::io::stdout());
        return Ok(());
    }

    rapport_observe::tracing_setup::init_tracing(cli.verbose, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    rapport_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init().await?;
    let json = cli.json;

    match cli.command {
        Commands::Contact { command } => match command {
            ContactCommand::Add {
                name,
                email,
                phone,
                linkedin,
                relationship,
                fields,
            } => {
                let known = cli::contact::known_fields(email, phone, linkedin, relationship);
                cli::contact::add_contact(&state, name, known, &fields, json).await?;
            }
            ContactCommand::List { starred } => {
                cli::contact::list_contacts(&state, starred, json).await?;
            }
            ContactCommand::Show { contact } => {
                cli::contact::show_contact(&state, &contact, json).await?;
            }
            ContactCommand::Delete { contact, force } => {
                cli::contact::delete_contact(&state, &contact, force, json).await?;
            }
            ContactCommand::Star { contact } => {
                cli::contact::toggle_star(&state, &contact, json).await?;
            }
        },

        Commands::Interaction { command } => match command {
            InteractionCommand::Add {
                contact,
                notes,
                kind,
                date,
            } => {
                cli::interaction::add_interaction(&state, &contact, notes, kind, date, json)
                    .await?;
            }
            InteractionCommand::List { contact } => {
                cli::interaction::list_interactions(&state, &contact, json).await?;
            }
        },

        Commands::Reminder { command } => match command {
            ReminderCommand::Add {
                contact,
                title,
                date,
                description,
            } => {
                cli::reminder::add_reminder(&state, &contact, title, date, description, json)
                    .await?;
            }
            ReminderCommand::List { all, limit } => {
                cli::reminder::list_reminders(&state, all, limit, json).await?;
            }
            ReminderCommand::Done { id, undo } => {
                cli::reminder::complete_reminder(&state, &id, undo, json).await?;
            }
        },

        Commands::ImportChat { contact, file } => {
            cli::chat::import_chat(&state, &contact, &file, json).await?;
        }

        Commands::Serve { port, host } => {
            // Ensure an API key exists, print it if new
            if let Some(api_key) = http::extractors::auth::ensure_api_key(&state.db_pool).await? {
                println!();
                println!(
                    "  {} API key generated (save this -- it won't be shown again):",
                    console::style("🔑").bold()
                );
                println!();
                println!("  {}", console::style(&api_key).yellow().bold());
                println!();
            }

            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(%addr, data_dir = %state.data_dir.display(), "Rapport API listening");
            println!(
                "  {} Rapport API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            println!("\n  Server stopped.");
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
