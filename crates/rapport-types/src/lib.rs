//! Shared domain types for Rapport.
//!
//! This crate contains the core domain types used across the Rapport
//! workspace: Contact, Interaction, Reminder, the transient extraction
//! result, lookup payloads, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod contact;
pub mod error;
pub mod extraction;
pub mod interaction;
pub mod llm;
pub mod lookup;
pub mod reminder;
