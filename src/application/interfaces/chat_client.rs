use async_trait::async_trait;

use crate::domain::DomainError;

/// A single two-message chat exchange: a `system` persona followed by one
/// `user` prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatRequest<'a> {
    pub system: &'a str,
    pub user: &'a str,
    pub temperature: f64,
}

/// An interface for sending chat-style prompts to a completion service.
///
/// Implementors encapsulate transport, serialization, and vendor-specific API
/// details. A response without any text content is `Ok(None)`; the caller
/// decides what to show instead.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<Option<String>, DomainError>;
}
