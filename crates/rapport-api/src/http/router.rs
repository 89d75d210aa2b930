//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/` except `/health`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Contacts
        .route(
            "/contacts",
            post(handlers::contact::create_contact).get(handlers::contact::list_contacts),
        )
        .route(
            "/contacts/{id}",
            get(handlers::contact::get_contact)
                .put(handlers::contact::update_contact)
                .delete(handlers::contact::delete_contact),
        )
        .route("/contacts/{id}/star", post(handlers::contact::toggle_star))
        // Interactions
        .route(
            "/contacts/{id}/interactions",
            get(handlers::interaction::list_interactions)
                .post(handlers::interaction::record_interaction),
        )
        .route(
            "/interactions/{id}",
            put(handlers::interaction::update_interaction)
                .delete(handlers::interaction::delete_interaction),
        )
        // Reminders
        .route(
            "/contacts/{id}/reminders",
            get(handlers::reminder::list_contact_reminders)
                .post(handlers::reminder::create_reminder),
        )
        .route("/reminders", get(handlers::reminder::list_reminders))
        .route(
            "/reminders/{id}",
            put(handlers::reminder::update_reminder).delete(handlers::reminder::delete_reminder),
        )
        .route(
            "/reminders/{id}/complete",
            post(handlers::reminder::complete_reminder),
        )
        // Enrichment
        .route(
            "/process-interaction",
            post(handlers::enrichment::process_interaction),
        )
        .route(
            "/process-chat-log",
            post(handlers::enrichment::process_chat_log),
        )
        .route("/update-contact", post(handlers::enrichment::update_contact))
        .route(
            "/contacts/{id}/chat-log",
            post(handlers::enrichment::import_chat_log),
        )
        .route(
            "/contacts/{id}/breaches",
            post(handlers::enrichment::check_breaches),
        )
        .route(
            "/contacts/{id}/profile",
            post(handlers::enrichment::enrich_profile),
        )
        .route("/contacts/{id}/osint", post(handlers::enrichment::osint_lookup))
        .route(
            "/contacts/{id}/tidy-notes",
            post(handlers::enrichment::tidy_notes),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
