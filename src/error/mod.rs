//! Error types for the chat core.
//!
//! | Error | Raised by | Handling |
//! |-------|-----------|----------|
//! | [`ConversationError::InvalidInput`] | empty submit | exchange never starts |
//! | [`ConversationError::NoInProgressMessage`] | sealing with nothing open | returned to caller |
//! | [`ProtocolViolation`] | unrecognized stream line | logged, line skipped |
//! | [`StreamError`] | connect/read failure, bad status, timeout | exchange `Failed`, fallback text shown |
//!
//! Opening an assistant message while another is in progress is a
//! programming error and panics.

mod conversation;
mod stream;

pub use conversation::ConversationError;
pub use stream::{ProtocolViolation, StreamError, CONNECTION_FALLBACK};

use thiserror::Error;

/// Unified error type for chat operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChatError {
    #[error(transparent)]
    Conversation(#[from] ConversationError),

    #[error(transparent)]
    Stream(#[from] StreamError),
}

impl ChatError {
    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Conversation(ConversationError::InvalidInput) => {
                "Please type a question first.".to_string()
            }
            ChatError::Conversation(err) => err.to_string(),
            ChatError::Stream(err) => err.user_message().to_string(),
        }
    }
}

/// Type alias for Results using ChatError.
pub type ChatResult<T> = Result<T, ChatError>;
