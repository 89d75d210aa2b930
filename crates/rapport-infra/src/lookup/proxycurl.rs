//! Proxycurl v2 professional-profile lookup.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use rapport_core::lookup::ProfileDirectory;
use rapport_types::error::EnrichmentError;
use rapport_types::lookup::ProfileSnapshot;

use super::{http_client, send_error, status_error};

const SERVICE: &str = "proxycurl";
const DEFAULT_BASE_URL: &str = "https://nubela.co/proxycurl";

/// Extra sections requested on every lookup.
const INCLUDE_SECTIONS: &[&str] = &[
    "skills",
    "inferred_salary",
    "personal_email",
    "personal_contact_number",
    "twitter_profile_id",
    "facebook_profile_id",
    "github_profile_id",
    "extra",
];

pub struct ProxycurlClient {
    http: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl ProxycurlClient {
    pub fn new(api_key: SecretString, timeout: Duration) -> Result<Self, EnrichmentError> {
        Ok(Self {
            http: http_client(SERVICE, timeout)?,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn query(profile_url: &str) -> Vec<(&str, &str)> {
        let mut query = vec![
            ("url", profile_url),
            ("use_cache", "if-present"),
            ("fallback_to_cache", "on-error"),
        ];
        query.extend(INCLUDE_SECTIONS.iter().map(|section| (*section, "include")));
        query
    }
}

impl ProfileDirectory for ProxycurlClient {
    async fn profile(&self, profile_url: &str) -> Result<ProfileSnapshot, EnrichmentError> {
        let response = self
            .http
            .get(format!("{}/api/v2/linkedin", self.base_url))
            .query(&Self::query(profile_url))
            .bearer_auth(self.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| send_error(SERVICE, e))?;

        if !response.status().is_success() {
            return Err(status_error(SERVICE, response).await);
        }

        response.json().await.map_err(|e| EnrichmentError::Upstream {
            service: SERVICE.to_string(),
            status: 200,
            message: format!("unreadable profile: {e}"),
        })
    }
}
