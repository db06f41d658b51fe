use thiserror::Error;

/// Recoverable misuse of the conversation operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    /// The submitted text is empty after trimming.
    #[error("message text is empty")]
    InvalidInput,

    /// `seal_assistant` was called with no assistant message open.
    #[error("no assistant message is in progress")]
    NoInProgressMessage,
}
