use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::application::{ChatClient, ChatRequest};
use crate::domain::DomainError;

/// Scripted reply for [`MockChatClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Echo the first line of the user prompt back, prefixed with `[mock]`.
    Echo,
    Text(String),
    /// A response with no text content.
    Empty,
    Upstream(String),
    Transport(String),
}

/// Offline [`ChatClient`] for tests and `--mock-llm` runs.
///
/// Counts calls and remembers the last request so callers can assert on what
/// would have gone over the wire.
pub struct MockChatClient {
    reply: MockReply,
    calls: AtomicUsize,
    last_request: Mutex<Option<(String, String, f64)>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self::with_reply(MockReply::Echo)
    }

    pub fn with_reply(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(system, user, temperature)` of the most recent call.
    pub fn last_request(&self) -> Option<(String, String, f64)> {
        self.last_request
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<Option<String>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some((
                request.system.to_string(),
                request.user.to_string(),
                request.temperature,
            ));
        }
        debug!("MockChatClient: call #{}", self.call_count());

        match &self.reply {
            MockReply::Echo => {
                let first_line = request.user.lines().next().unwrap_or_default();
                Ok(Some(format!("[mock] {first_line}")))
            }
            MockReply::Text(text) => Ok(Some(text.clone())),
            MockReply::Empty => Ok(None),
            MockReply::Upstream(msg) => Err(DomainError::upstream(msg.clone())),
            MockReply::Transport(msg) => Err(DomainError::transport(msg.clone())),
        }
    }
}
