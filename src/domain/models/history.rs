use serde::{Deserialize, Serialize};

use super::Query;

/// Key under which the serialized history lives in the key-value store.
pub const HISTORY_STORAGE_KEY: &str = "linkr-history";

/// Bounded, most-recent-first list of past queries.
///
/// Lookups return the first match, so a domain recorded twice shadows its
/// older entry without removing it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<Query>,
}

impl History {
    pub const MAX_ENTRIES: usize = 5;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn find(&self, domain: &str) -> Option<&Query> {
        self.entries.iter().find(|q| q.domain() == domain)
    }

    /// Prepend `query` and drop everything past [`Self::MAX_ENTRIES`].
    pub fn record(&mut self, query: Query) {
        self.entries.insert(0, query);
        self.entries.truncate(Self::MAX_ENTRIES);
    }

    pub fn entries(&self) -> &[Query] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<Query>> for History {
    fn from(entries: Vec<Query>) -> Self {
        Self { entries }
    }
}
