pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    ChatClient, ChatRequest, KeyValueStore, RelayDomainUseCase, RelayService, StudioController,
    StudioEvent, StudioObserver, StudioState, SubmitOutcome,
};

pub use cli::Commands;

pub use connector::{
    build_router, serve, Container, ContainerConfig, HttpRelayClient, InMemoryKeyValueStore,
    JsonFileKeyValueStore, MockChatClient, MockReply, OpenAiChatClient, RelayConfig,
    TerminalObserver, RELAY_PATH,
};

pub use domain::{build_prompt, DomainError, History, Query, HISTORY_STORAGE_KEY};
