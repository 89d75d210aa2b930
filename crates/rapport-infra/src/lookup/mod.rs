//! HTTP clients for the third-party lookup services.
//!
//! Each client implements one of the directory ports in
//! `rapport_core::lookup`. Transport failures and non-success statuses become
//! [`EnrichmentError::Upstream`]; a request that runs past its deadline becomes
//! [`EnrichmentError::Timeout`].

pub mod hibp;
pub mod osint;
pub mod proxycurl;

use std::time::Duration;

use rapport_types::error::EnrichmentError;

pub use hibp::HibpClient;
pub use osint::OsintIndustriesClient;
pub use proxycurl::ProxycurlClient;

const USER_AGENT: &str = concat!("rapport/", env!("CARGO_PKG_VERSION"));

/// Status reported when the service never answered.
const NO_RESPONSE_STATUS: u16 = 502;

/// Build the client carrying the request deadline.
fn http_client(service: &str, timeout: Duration) -> Result<reqwest::Client, EnrichmentError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| {
            tracing::error!(service, error = %e, "Failed to build lookup HTTP client");
            EnrichmentError::Upstream {
                service: service.to_string(),
                status: NO_RESPONSE_STATUS,
                message: format!("failed to build HTTP client: {e}"),
            }
        })
}

fn send_error(service: &str, err: reqwest::Error) -> EnrichmentError {
    if err.is_timeout() {
        tracing::warn!(service, "Lookup timed out");
        return EnrichmentError::Timeout {
            service: service.to_string(),
        };
    }
    EnrichmentError::Upstream {
        service: service.to_string(),
        status: err.status().map(|s| s.as_u16()).unwrap_or(NO_RESPONSE_STATUS),
        message: err.to_string(),
    }
}

/// Turn a non-success response into an upstream error carrying its body.
async fn status_error(service: &str, response: reqwest::Response) -> EnrichmentError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(service, status = status.as_u16(), "Lookup failed");
    EnrichmentError::Upstream {
        service: service.to_string(),
        status: status.as_u16(),
        message: if body.trim().is_empty() {
            status.canonical_reason().unwrap_or("request failed").to_string()
        } else {
            body
        },
    }
}
