pub mod http;

mod http_relay_client;
mod in_memory_key_value_store;
mod json_file_key_value_store;
mod mock_chat_client;
mod openai_chat_client;
mod terminal_observer;

pub use http::*;
pub use http_relay_client::*;
pub use in_memory_key_value_store::*;
pub use json_file_key_value_store::*;
pub use mock_chat_client::*;
pub use openai_chat_client::*;
pub use terminal_observer::*;
