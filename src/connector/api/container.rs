use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::{KeyValueStore, RelayDomainUseCase, RelayService, StudioController};
use crate::{
    HttpRelayClient, InMemoryKeyValueStore, JsonFileKeyValueStore, MockChatClient, MockReply,
    OpenAiChatClient, RelayConfig, TerminalObserver,
};

const HISTORY_FILE: &str = "history.json";

pub struct ContainerConfig {
    pub data_dir: String,
    /// Answer every prompt locally instead of calling the completion service.
    pub mock_llm: bool,
    /// Keep history in memory only; nothing is read from or written to disk.
    pub memory_storage: bool,
    pub timeout_secs: u64,
}

pub struct Container {
    store: Arc<dyn KeyValueStore>,
    relay_config: Option<RelayConfig>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = if config.memory_storage {
            debug!("Using in-memory history storage");
            Arc::new(InMemoryKeyValueStore::new())
        } else {
            let path = PathBuf::from(&config.data_dir).join(HISTORY_FILE);
            debug!("Using history file {}", path.display());
            Arc::new(JsonFileKeyValueStore::new(path))
        };

        // Credentials are read once here; commands that never reach the
        // completion service work without them.
        let relay_config = if config.mock_llm {
            None
        } else {
            match RelayConfig::from_env() {
                Ok(relay_config) => Some(relay_config.with_timeout_secs(config.timeout_secs)),
                Err(e) => {
                    debug!("Completion service not configured: {}", e);
                    None
                }
            }
        };

        Ok(Self {
            store,
            relay_config,
            config,
        })
    }

    pub fn relay_use_case(&self) -> Result<RelayDomainUseCase> {
        if self.config.mock_llm {
            debug!("Using mock completion service");
            return Ok(RelayDomainUseCase::new(Arc::new(MockChatClient::new())));
        }

        let relay_config = self
            .relay_config
            .as_ref()
            .context("OPENAI_API_KEY is not set (use --mock-llm to run offline)")?;
        debug!("Using completion service {:?}", relay_config);
        let client = OpenAiChatClient::new(relay_config)?;
        Ok(RelayDomainUseCase::new(Arc::new(client)))
    }

    /// The relay a submit goes through: a remote endpoint when given,
    /// otherwise the completion service called in-process.
    pub fn relay_service(&self, endpoint: Option<&str>) -> Result<Arc<dyn RelayService>> {
        match endpoint {
            Some(url) => {
                debug!("Relaying through {}", url);
                let client =
                    HttpRelayClient::new(url, Duration::from_secs(self.config.timeout_secs))?;
                Ok(Arc::new(client))
            }
            None => Ok(Arc::new(self.relay_use_case()?)),
        }
    }

    pub async fn studio_controller(&self, endpoint: Option<&str>) -> Result<StudioController> {
        let relay = self.relay_service(endpoint)?;
        Ok(StudioController::load(relay, self.store.clone())
            .await
            .with_observer(Arc::new(TerminalObserver::new())))
    }

    /// Controller for commands that only read history. Its relay refuses
    /// every call, so nothing can reach the network through it.
    pub async fn history_controller(&self) -> StudioController {
        let offline = MockChatClient::with_reply(MockReply::Transport(
            "history commands do not call the completion service".to_string(),
        ));
        let relay = Arc::new(RelayDomainUseCase::new(Arc::new(offline)));
        StudioController::load(relay, self.store.clone()).await
    }
}
