use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::application::{ChatClient, ChatRequest, RelayService};
use crate::domain::{build_prompt, DomainError, FALLBACK_OUTPUT, SYSTEM_PROMPT, TEMPERATURE};

/// Builds the consulting prompt for a domain and forwards it to the
/// completion service. One outbound call per valid invocation, never retried.
pub struct RelayDomainUseCase {
    chat_client: Arc<dyn ChatClient>,
}

impl RelayDomainUseCase {
    pub fn new(chat_client: Arc<dyn ChatClient>) -> Self {
        Self { chat_client }
    }

    pub async fn execute(&self, domain: &str) -> Result<String, DomainError> {
        if domain.is_empty() {
            return Err(DomainError::invalid_input("Missing domain in request body"));
        }

        info!("Generating brief for domain: {}", domain);
        let prompt = build_prompt(domain);

        let content = self
            .chat_client
            .complete(ChatRequest {
                system: SYSTEM_PROMPT,
                user: &prompt,
                temperature: TEMPERATURE,
            })
            .await?;

        match content {
            Some(text) if !text.is_empty() => Ok(text),
            _ => {
                debug!("Completion service returned no content for {}", domain);
                Ok(FALLBACK_OUTPUT.to_string())
            }
        }
    }
}

#[async_trait]
impl RelayService for RelayDomainUseCase {
    async fn relay(&self, domain: &str) -> Result<String, DomainError> {
        self.execute(domain).await
    }
}
