use async_trait::async_trait;

use crate::domain::DomainError;

/// String key-value persistence for client-side state.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;
}
