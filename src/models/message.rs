use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Identifier of one question/answer exchange within a session.
///
/// Allocated by the session controller, strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExchangeId(pub u64);

impl std::fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One entry of the transcript.
///
/// A message is mutable only while `is_streaming` is set, and only through
/// [`Conversation`](crate::state::Conversation).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: Uuid,
    pub role: MessageRole,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Whether the message is the in-progress assistant message
    #[serde(default)]
    pub is_streaming: bool,
    /// Exchange that produced this message; `None` for seeded messages
    #[serde(default)]
    pub exchange: Option<ExchangeId>,
}

impl Message {
    fn new(role: MessageRole, text: String, is_streaming: bool, exchange: Option<ExchangeId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text,
            created_at: Utc::now(),
            is_streaming,
            exchange,
        }
    }

    /// A sealed user message.
    pub fn user(text: impl Into<String>, exchange: Option<ExchangeId>) -> Self {
        Self::new(MessageRole::User, text.into(), false, exchange)
    }

    /// A sealed assistant message with final text.
    pub fn assistant(text: impl Into<String>, exchange: Option<ExchangeId>) -> Self {
        Self::new(MessageRole::Assistant, text.into(), false, exchange)
    }

    /// An empty in-progress assistant message.
    pub fn streaming_assistant(exchange: Option<ExchangeId>) -> Self {
        Self::new(MessageRole::Assistant, String::new(), true, exchange)
    }

    pub fn is_sealed(&self) -> bool {
        !self.is_streaming
    }

    pub(crate) fn append(&mut self, fragment: &str) {
        self.text.push_str(fragment);
    }

    /// Finalize the message, optionally replacing the accumulated text.
    pub(crate) fn seal(&mut self, final_text: Option<&str>) {
        if let Some(text) = final_text {
            self.text = text.to_string();
        }
        self.is_streaming = false;
    }
}
