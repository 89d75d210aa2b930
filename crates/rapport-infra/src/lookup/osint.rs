//! OSINT Industries v2 email search.
//!
//! Searches can take a long time upstream, so the client enforces its own
//! bounded wait and reports overruns as a timeout.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use rapport_core::lookup::OsintDirectory;
use rapport_types::error::EnrichmentError;

use super::{http_client, send_error, status_error};

const SERVICE: &str = "OSINT lookup";
const DEFAULT_BASE_URL: &str = "https://api.osint.industries";

pub struct OsintIndustriesClient {
    http: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    timeout: Duration,
}

impl OsintIndustriesClient {
    pub fn new(api_key: SecretString, timeout: Duration) -> Result<Self, EnrichmentError> {
        Ok(Self {
            http: http_client(SERVICE, timeout)?,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl OsintDirectory for OsintIndustriesClient {
    async fn search_email(&self, email: &str) -> Result<Value, EnrichmentError> {
        let upstream_timeout = self.timeout.as_secs().max(1).to_string();

        let response = self
            .http
            .get(format!("{}/v2/request", self.base_url))
            .query(&[
                ("type", "email"),
                ("query", email),
                ("timeout", upstream_timeout.as_str()),
            ])
            .header("api-key", self.api_key.expose_secret())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| send_error(SERVICE, e))?;

        if !response.status().is_success() {
            return Err(status_error(SERVICE, response).await);
        }

        response.json().await.map_err(|e| {
            if e.is_timeout() {
                send_error(SERVICE, e)
            } else {
                EnrichmentError::Upstream {
                    service: SERVICE.to_string(),
                    status: 200,
                    message: format!("unreadable response: {e}"),
                }
            }
        })
    }
}
