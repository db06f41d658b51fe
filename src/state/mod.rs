//! State management.
//!
//! [`Conversation`] is the only mutable shared state of a chat session. It is
//! owned by the session controller; everything else reads it or observes it.

mod conversation;

pub use conversation::{Conversation, ConversationUpdate};
