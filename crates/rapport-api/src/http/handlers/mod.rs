//! HTTP request handlers for the REST API.

pub mod contact;
pub mod enrichment;
pub mod interaction;
pub mod reminder;

use std::str::FromStr;

use crate::http::error::AppError;

/// Parse a path id; a malformed id can never match a row, so it reports
/// the caller's not-found error.
pub(crate) fn parse_id<T: FromStr>(raw: &str, not_found: impl Into<AppError>) -> Result<T, AppError> {
    raw.parse().map_err(|_| not_found.into())
}
