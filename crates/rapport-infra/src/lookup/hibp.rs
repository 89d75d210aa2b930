//! Have I Been Pwned v3 breach lookup.

use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use rapport_core::lookup::BreachDirectory;
use rapport_types::error::EnrichmentError;
use rapport_types::lookup::BreachReport;

use super::{http_client, send_error, status_error};

const SERVICE: &str = "haveibeenpwned";
const DEFAULT_BASE_URL: &str = "https://haveibeenpwned.com/api/v3";

#[derive(Debug, Deserialize)]
struct Breach {
    #[serde(rename = "Name")]
    name: String,
}

pub struct HibpClient {
    http: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl HibpClient {
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

    fn account_url(&self, email: &str) -> Result<reqwest::Url, EnrichmentError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| EnrichmentError::InvalidInput(format!("bad HIBP base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| EnrichmentError::InvalidInput("bad HIBP base URL".to_string()))?
            .pop_if_empty()
            .push("breachedaccount")
            .push(email);
        Ok(url)
    }
}

impl BreachDirectory for HibpClient {
    async fn breaches_for(&self, email: &str) -> Result<BreachReport, EnrichmentError> {
        let response = self
            .http
            .get(self.account_url(email)?)
            .header("hibp-api-key", self.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| send_error(SERVICE, e))?;

        // 404 is how the API says "no breaches".
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(BreachReport::default());
        }
        if !response.status().is_success() {
            return Err(status_error(SERVICE, response).await);
        }

        let breaches: Vec<Breach> = response.json().await.map_err(|e| EnrichmentError::Upstream {
            service: SERVICE.to_string(),
            status: 200,
            message: format!("unreadable response: {e}"),
        })?;

        Ok(BreachReport {
            breaches: breaches.into_iter().map(|b| b.name).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> HibpClient {
        HibpClient::new(SecretString::from("hibp-test"), Duration::from_secs(5))
            .unwrap()
            .with_base_url(format!("{}/api/v3", server.uri()))
    }

    #[tokio::test]
    async fn test_breach_names_are_collected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/breachedaccount/maria@example.com"))
            .and(header("hibp-api-key", "hibp-test"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"Name": "Adobe"}, {"Name": "Canva"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let report = client(&server).breaches_for("maria@example.com").await.unwrap();
        assert_eq!(report.summary(), "Adobe, Canva");
    }

    #[tokio::test]
    async fn test_not_found_means_no_breaches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let report = client(&server).breaches_for("clean@example.com").await.unwrap();
        assert!(report.breaches.is_empty());
        assert_eq!(report.summary(), "No breaches found");
    }

    #[tokio::test]
    async fn test_other_status_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Access denied"))
            .mount(&server)
            .await;

        let err = client(&server).breaches_for("maria@example.com").await.unwrap_err();
        match err {
            EnrichmentError::Upstream { status, message, .. } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Access denied");
            }
            other => panic!("expected Upstream, got {other}"),
        }
    }

    #[test]
    fn test_email_is_a_single_path_segment() {
        let client = HibpClient::new(SecretString::from("k"), Duration::from_secs(1)).unwrap();
        let url = client.account_url("a/b@example.com").unwrap();
        assert_eq!(
            url.as_str(),
            "https://haveibeenpwned.com/api/v3/breachedaccount/a%2Fb@example.com"
        );
    }
}
