//! # Domain Layer
//!
//! Core types of the studio: queries, the bounded history, the prompt
//! template, and the error taxonomy. Independent of HTTP and storage.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
