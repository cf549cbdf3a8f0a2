use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream error: {0}")]
    UpstreamError(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::UpstreamError(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportError(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageError(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub fn is_upstream_error(&self) -> bool {
        matches!(self, Self::UpstreamError(_))
    }

    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::TransportError(_))
    }

    /// The bare message without the variant prefix, as shown to end users.
    pub fn message(&self) -> String {
        match self {
            Self::InvalidInput(msg)
            | Self::UpstreamError(msg)
            | Self::TransportError(msg)
            | Self::StorageError(msg)
            | Self::ConfigError(msg) => msg.clone(),
            Self::IoError(e) => e.to_string(),
        }
    }
}
