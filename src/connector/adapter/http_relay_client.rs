use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::RelayService;
use crate::domain::DomainError;

use super::http::RELAY_PATH;

#[derive(Serialize)]
struct RelayRequest<'a> {
    domain: &'a str,
}

#[derive(Deserialize)]
struct RelayResponse {
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// [`RelayService`] that goes through a running `linkr serve` endpoint
/// instead of calling the completion service directly.
pub struct HttpRelayClient {
    client: reqwest::Client,
    url: String,
}

impl HttpRelayClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        let base: String = base_url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: format!("{}{}", base.trim_end_matches('/'), RELAY_PATH),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RelayService for HttpRelayClient {
    async fn relay(&self, domain: &str) -> Result<String, DomainError> {
        debug!("HttpRelayClient: POST {} for {}", self.url, domain);
        let response = self
            .client
            .post(&self.url)
            .json(&RelayRequest { domain })
            .send()
            .await
            .map_err(|e| DomainError::transport(e.to_string()))?;

        let status = response.status();
        let body: RelayResponse = response
            .json()
            .await
            .map_err(|e| DomainError::transport(format!("Unreadable relay response ({status}): {e}")))?;

        match (body.output, body.error) {
            (Some(output), _) => Ok(output),
            (None, Some(error)) if status.is_client_error() => Err(DomainError::invalid_input(error)),
            (None, Some(error)) => Err(DomainError::upstream(error)),
            (None, None) => Err(DomainError::transport(format!(
                "Relay answered {status} without output"
            ))),
        }
    }
}
