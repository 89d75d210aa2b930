//! Observability setup for Rapport: structured logging with optional
//! OpenTelemetry span export.

pub mod tracing_setup;
