//! Trait abstractions for dependency injection and testability.
//!
//! - [`HttpClient`] - the streaming POST the chat exchange runs on
//! - [`ConversationObserver`] - read-only listener for transcript changes

pub mod http;
pub mod observer;

pub use http::{ByteStream, Headers, HttpClient, HttpError};
pub use observer::ConversationObserver;
