use async_trait::async_trait;

use crate::domain::DomainError;

/// Turns a company domain into a generated brief.
///
/// Implemented in-process by the relay use case and remotely by the HTTP
/// client that talks to the `/api/linkr` endpoint.
#[async_trait]
pub trait RelayService: Send + Sync {
    async fn relay(&self, domain: &str) -> Result<String, DomainError>;
}
