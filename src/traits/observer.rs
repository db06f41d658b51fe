//! Conversation observer trait.
//!
//! Observers are the presentation layer's window onto the transcript. They
//! receive every change synchronously, after the change has been fully
//! applied, together with a read-only view of all messages. They cannot
//! mutate the conversation.

use crate::models::Message;
use crate::state::ConversationUpdate;

/// Listener notified once per conversation mutation.
pub trait ConversationObserver: Send {
    /// Called after `update` has been applied; `messages` is the full
    /// transcript in its post-update state.
    fn on_update(&mut self, update: &ConversationUpdate, messages: &[Message]);
}

impl<F> ConversationObserver for F
where
    F: FnMut(&ConversationUpdate, &[Message]) + Send,
{
    fn on_update(&mut self, update: &ConversationUpdate, messages: &[Message]) {
        self(update, messages)
    }
}
