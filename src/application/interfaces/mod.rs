mod chat_client;
mod key_value_store;
mod relay_service;
mod studio_observer;

pub use chat_client::*;
pub use key_value_store::*;
pub use relay_service::*;
pub use studio_observer::*;
