//! # Connector Layer
//!
//! External integrations implementing application ports:
//! - Completion service (OpenAI chat completions, plus an offline mock)
//! - Relay endpoint (axum server and the HTTP client that calls it)
//! - Key-value storage (in-memory and JSON file)
//! - Terminal display

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
