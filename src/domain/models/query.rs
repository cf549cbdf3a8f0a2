use serde::{Deserialize, Serialize};

/// A completed relay: the domain that was asked about and the text the
/// completion service produced for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    domain: String,
    output: String,
}

impl Query {
    pub fn new(domain: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            output: output.into(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn output(&self) -> &str {
        &self.output
    }
}
