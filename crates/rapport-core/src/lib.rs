//! Business logic and repository trait definitions for Rapport.
//!
//! This crate defines the "ports" (repository, LLM provider, and lookup
//! traits) that the infrastructure layer implements, plus the enrichment
//! pipeline built on top of them. It depends only on `rapport-types` --
//! never on `rapport-infra` or any database/IO crate.

pub mod enrichment;
pub mod llm;
pub mod lookup;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
