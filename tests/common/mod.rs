//! Common test utilities for integration tests.
//!
//! # Example
//!
//! ```ignore
//! use common::{chunks, scripted_client, test_config, CHAT_URL};
//!
//! let client = scripted_client(chunks(&["data:Hi\n", "data:STREAM_END\n"]));
//! let controller = SessionController::new(client, test_config());
//! ```

pub mod mocks;

pub use mocks::*;

use std::sync::{Arc, Mutex};

use streamchat::config::ChatConfig;
use streamchat::models::Message;
use streamchat::state::ConversationUpdate;

/// Chat endpoint under the default configuration.
#[allow(dead_code)]
pub const CHAT_URL: &str = "http://localhost:8080/api/chat";

/// Default configuration without the greeting, so transcripts start empty.
pub fn test_config() -> ChatConfig {
    ChatConfig::default().with_greeting(None)
}

/// Shared log of every update an observer saw, with the text of the last
/// message at that moment.
pub type UpdateLog = Arc<Mutex<Vec<(ConversationUpdate, Option<String>)>>>;

/// Build an observer closure and the log it writes to.
#[allow(dead_code)]
pub fn recording_observer() -> (
    UpdateLog,
    impl FnMut(&ConversationUpdate, &[Message]) + Send + 'static,
) {
    let log: UpdateLog = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let observer = move |update: &ConversationUpdate, messages: &[Message]| {
        let last = messages.last().map(|m| m.text.clone());
        sink.lock().unwrap().push((update.clone(), last));
    };
    (log, observer)
}
