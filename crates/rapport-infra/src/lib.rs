//! Infrastructure layer for Rapport.
//!
//! Implements the ports defined in `rapport-core`: SQLite repositories,
//! completion providers (OpenAI-compatible and Anthropic), and HTTP clients
//! for the breach, profile, and OSINT lookups. Also loads configuration and
//! credentials.

pub mod config;
pub mod llm;
pub mod lookup;
pub mod sqlite;
