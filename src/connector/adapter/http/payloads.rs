use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body accepted by the relay endpoint.
///
/// `domain` is kept loose: any falsy value (missing, `null`, `false`, `0`,
/// `""`) is answered with a 400, while any other value is relayed as text.
#[derive(Debug, Default, Deserialize)]
pub struct RelayPayload {
    #[serde(default)]
    pub domain: Option<Value>,
}

impl RelayPayload {
    pub fn domain(&self) -> Option<Cow<'_, str>> {
        match self.domain.as_ref()? {
            Value::Null | Value::Bool(false) => None,
            Value::String(domain) if domain.is_empty() => None,
            Value::String(domain) => Some(Cow::Borrowed(domain.as_str())),
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputBody {
    pub output: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}
