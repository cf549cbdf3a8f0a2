use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::{ChatClient, ChatRequest};
use crate::domain::DomainError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Completion-service settings, read once at process start.
#[derive(Clone)]
pub struct RelayConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl RelayConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Construct from environment variables:
    ///
    /// | Variable          | Default                  |
    /// |-------------------|--------------------------|
    /// | `OPENAI_API_KEY`  | required                 |
    /// | `OPENAI_MODEL`    | `gpt-3.5-turbo`          |
    /// | `OPENAI_BASE_URL` | `https://api.openai.com` |
    pub fn from_env() -> Result<Self, DomainError> {
        let key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| DomainError::config("OPENAI_API_KEY is not set"))?;
        let mut config = Self::new(key);
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            config = config.with_model(model);
        }
        if let Ok(base) = std::env::var("OPENAI_BASE_URL") {
            config = config.with_base_url(base);
        }
        Ok(config)
    }
}

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: [ApiMessage<'a>; 2],
    temperature: f64,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Both shapes the service answers with: a completion or an error payload.
#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    error: Option<ApiErrorBody>,
    #[serde(default)]
    choices: Option<Vec<Choice>>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// [`ChatClient`] for the OpenAI chat-completions API, bearer-token
/// authenticated.
///
/// An `error` object in the response body is reported as
/// [`DomainError::UpstreamError`] whatever the HTTP status; everything else
/// that goes wrong on the way is a [`DomainError::TransportError`].
pub struct OpenAiChatClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
}

impl OpenAiChatClient {
    pub fn new(config: &RelayConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::config(format!("Failed to create HTTP client: {e}")))?;
        let url = format!(
            "{}{}",
            config.base_url.trim_end_matches('/'),
            COMPLETIONS_PATH
        );
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            url,
        })
    }

    fn interpret(status: reqwest::StatusCode, body: &str) -> Result<Option<String>, DomainError> {
        let parsed: ApiResponse = match serde_json::from_str(body) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => {
                return Err(DomainError::transport(format!(
                    "OpenAiChatClient: failed to parse response: {e}"
                )));
            }
            Err(_) => {
                return Err(DomainError::transport(format!(
                    "OpenAiChatClient: API returned {status}"
                )));
            }
        };

        if let Some(error) = parsed.error {
            let message = error
                .message
                .unwrap_or_else(|| format!("Completion service returned {status}"));
            return Err(DomainError::upstream(message));
        }

        if !status.is_success() {
            return Err(DomainError::transport(format!(
                "OpenAiChatClient: API returned {status}"
            )));
        }

        Ok(parsed
            .choices
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content))
    }
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<Option<String>, DomainError> {
        let body = ApiRequest {
            model: &self.model,
            messages: [
                ApiMessage {
                    role: "system",
                    content: request.system,
                },
                ApiMessage {
                    role: "user",
                    content: request.user,
                },
            ],
            temperature: request.temperature,
        };

        debug!("OpenAiChatClient: POST {} (model {})", self.url, self.model);
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::transport(format!("OpenAiChatClient: request failed: {e}")))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            DomainError::transport(format!("OpenAiChatClient: failed to read response: {e}"))
        })?;

        let result = Self::interpret(status, &text);
        if let Err(e) = &result {
            warn!("OpenAiChatClient: {status}: {e}");
        }
        result
    }
}
