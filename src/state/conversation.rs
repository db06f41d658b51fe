//! Conversation transcript with intention-revealing mutators.
//!
//! The transcript is append-only. At most one message is in progress; when
//! present it is an assistant message and the last element. Every mutation
//! notifies observers before returning, with the change already applied.

use crate::error::ConversationError;
use crate::models::{ExchangeId, Message, MessageRole};
use crate::traits::ConversationObserver;

/// A single applied change, by message index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationUpdate {
    /// A message was appended (sealed, or opened in progress)
    Appended { index: usize, role: MessageRole },
    /// Text was appended to the in-progress message
    Delta { index: usize, fragment: String },
    /// The in-progress message was sealed with its final text
    Sealed { index: usize },
}

#[derive(Default)]
pub struct Conversation {
    messages: Vec<Message>,
    in_progress: Option<usize>,
    observers: Vec<Box<dyn ConversationObserver>>,
}

impl std::fmt::Debug for Conversation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conversation")
            .field("messages", &self.messages)
            .field("in_progress", &self.in_progress)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// A conversation opening with a sealed assistant greeting.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut conversation = Self::new();
        conversation.messages.push(Message::assistant(greeting, None));
        conversation
    }

    /// Register an observer. It sees only changes made after registration.
    pub fn observe(&mut self, observer: Box<dyn ConversationObserver>) {
        self.observers.push(observer);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The message currently receiving text, if any.
    pub fn in_progress(&self) -> Option<&Message> {
        self.in_progress.map(|i| &self.messages[i])
    }

    pub fn has_in_progress(&self) -> bool {
        self.in_progress.is_some()
    }

    /// Append a sealed user message.
    pub fn append_user(
        &mut self,
        text: &str,
        exchange: Option<ExchangeId>,
    ) -> Result<usize, ConversationError> {
        if text.trim().is_empty() {
            return Err(ConversationError::InvalidInput);
        }
        // A user turn may only follow sealed messages.
        assert!(
            self.in_progress.is_none(),
            "user message appended while an assistant message is in progress"
        );
        Ok(self.push(Message::user(text, exchange)))
    }

    /// Append a sealed assistant message with final text.
    pub fn append_assistant(&mut self, text: &str, exchange: Option<ExchangeId>) -> usize {
        assert!(
            self.in_progress.is_none(),
            "sealed assistant message appended while another is in progress"
        );
        self.push(Message::assistant(text, exchange))
    }

    /// Open an empty in-progress assistant message.
    ///
    /// # Panics
    ///
    /// If a message is already in progress. Callers seal first.
    pub fn open_assistant(&mut self, exchange: Option<ExchangeId>) -> usize {
        assert!(
            self.in_progress.is_none(),
            "open_assistant called while message {:?} is in progress",
            self.in_progress
        );
        self.messages.push(Message::streaming_assistant(exchange));
        let index = self.messages.len() - 1;
        self.in_progress = Some(index);
        self.notify(ConversationUpdate::Appended {
            index,
            role: MessageRole::Assistant,
        });
        index
    }

    /// Append `fragment` to the in-progress message.
    ///
    /// Does nothing when no message is open or the fragment is empty.
    pub fn append_to_assistant(&mut self, fragment: &str) {
        let Some(index) = self.in_progress else {
            tracing::debug!("Dropping {} byte fragment: no message in progress", fragment.len());
            return;
        };
        if fragment.is_empty() {
            return;
        }
        self.messages[index].append(fragment);
        self.notify(ConversationUpdate::Delta {
            index,
            fragment: fragment.to_string(),
        });
    }

    /// Seal the in-progress message.
    ///
    /// `final_text` replaces the accumulated text instead of extending it.
    pub fn seal_assistant(&mut self, final_text: Option<&str>) -> Result<usize, ConversationError> {
        let index = self
            .in_progress
            .take()
            .ok_or(ConversationError::NoInProgressMessage)?;
        self.messages[index].seal(final_text);
        self.notify(ConversationUpdate::Sealed { index });
        Ok(index)
    }

    fn push(&mut self, message: Message) -> usize {
        let role = message.role;
        self.messages.push(message);
        let index = self.messages.len() - 1;
        self.notify(ConversationUpdate::Appended { index, role });
        index
    }

    fn notify(&mut self, update: ConversationUpdate) {
        debug_assert!(self.invariant_holds());
        for observer in &mut self.observers {
            observer.on_update(&update, &self.messages);
        }
    }

    /// Zero or one message streaming, and if one, it is the last, it is an
    /// assistant message, and `in_progress` points at it.
    pub fn invariant_holds(&self) -> bool {
        let streaming: Vec<usize> = self
            .messages
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_streaming)
            .map(|(i, _)| i)
            .collect();
        match (streaming.as_slice(), self.in_progress) {
            ([], None) => true,
            ([i], Some(j)) => {
                *i == j
                    && j + 1 == self.messages.len()
                    && self.messages[j].role == MessageRole::Assistant
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<(ConversationUpdate, Vec<Message>)>>>;

    fn recording(conversation: &mut Conversation) -> Log {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        conversation.observe(Box::new(move |u: &ConversationUpdate, m: &[Message]| {
            sink.lock().unwrap().push((u.clone(), m.to_vec()));
        }));
        log
    }

    #[test]
    fn test_new_is_empty() {
        let conversation = Conversation::new();
        assert!(conversation.is_empty());
        assert!(conversation.in_progress().is_none());
        assert!(conversation.invariant_holds());
    }

    #[test]
    fn test_with_greeting_is_sealed_assistant() {
        let conversation = Conversation::with_greeting("Hi there");
        assert_eq!(conversation.len(), 1);
        let greeting = conversation.last().unwrap();
        assert_eq!(greeting.role, MessageRole::Assistant);
        assert!(greeting.is_sealed());
        assert_eq!(greeting.exchange, None);
    }

    #[test]
    fn test_append_user_rejects_blank() {
        let mut conversation = Conversation::new();
        assert_eq!(
            conversation.append_user("", None),
            Err(ConversationError::InvalidInput)
        );
        assert_eq!(
            conversation.append_user(" \t\n", None),
            Err(ConversationError::InvalidInput)
        );
        assert!(conversation.is_empty());
    }

    #[test]
    fn test_append_user_keeps_text_verbatim() {
        let mut conversation = Conversation::new();
        conversation.append_user("  hello  ", Some(ExchangeId(1))).unwrap();
        assert_eq!(conversation.messages()[0].text, "  hello  ");
        assert!(conversation.messages()[0].is_sealed());
    }

    #[test]
    fn test_open_append_seal_lifecycle() {
        let mut conversation = Conversation::new();
        conversation.append_user("q", None).unwrap();
        let index = conversation.open_assistant(Some(ExchangeId(1)));
        assert_eq!(index, 1);
        assert!(conversation.invariant_holds());

        conversation.append_to_assistant("Hello\n");
        conversation.append_to_assistant(" World\n");
        assert_eq!(conversation.in_progress().unwrap().text, "Hello\n World\n");

        assert_eq!(conversation.seal_assistant(None), Ok(1));
        assert!(conversation.in_progress().is_none());
        assert!(conversation.messages()[1].is_sealed());
        assert_eq!(conversation.messages()[1].text, "Hello\n World\n");
        assert!(conversation.invariant_holds());
    }

    #[test]
    fn test_seal_with_override_replaces_partial_text() {
        let mut conversation = Conversation::new();
        conversation.open_assistant(None);
        conversation.append_to_assistant("half an ans");
        conversation.seal_assistant(Some("fallback")).unwrap();
        assert_eq!(conversation.last().unwrap().text, "fallback");
    }

    #[test]
    fn test_seal_without_open_fails() {
        let mut conversation = Conversation::new();
        assert_eq!(
            conversation.seal_assistant(None),
            Err(ConversationError::NoInProgressMessage)
        );
        conversation.open_assistant(None);
        conversation.seal_assistant(None).unwrap();
        assert_eq!(
            conversation.seal_assistant(None),
            Err(ConversationError::NoInProgressMessage)
        );
    }

    #[test]
    fn test_append_without_open_is_noop() {
        let mut conversation = Conversation::with_greeting("sealed");
        let log = recording(&mut conversation);
        conversation.append_to_assistant("ignored");
        assert_eq!(conversation.last().unwrap().text, "sealed");
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    #[should_panic(expected = "open_assistant called while message")]
    fn test_open_twice_panics() {
        let mut conversation = Conversation::new();
        conversation.open_assistant(None);
        conversation.open_assistant(None);
    }

    #[test]
    fn test_observers_see_applied_state() {
        let mut conversation = Conversation::new();
        let log = recording(&mut conversation);

        conversation.append_user("q", None).unwrap();
        conversation.open_assistant(None);
        conversation.append_to_assistant("ab");
        conversation.append_to_assistant("");
        conversation.seal_assistant(None).unwrap();

        let log = log.lock().unwrap();
        let updates: Vec<_> = log.iter().map(|(u, _)| u.clone()).collect();
        assert_eq!(
            updates,
            vec![
                ConversationUpdate::Appended {
                    index: 0,
                    role: MessageRole::User
                },
                ConversationUpdate::Appended {
                    index: 1,
                    role: MessageRole::Assistant
                },
                ConversationUpdate::Delta {
                    index: 1,
                    fragment: "ab".to_string()
                },
                ConversationUpdate::Sealed { index: 1 },
            ]
        );

        // Snapshot taken at Delta time already contains the fragment.
        assert_eq!(log[2].1[1].text, "ab");
        assert!(log[2].1[1].is_streaming);
        assert!(!log[3].1[1].is_streaming);
    }
}
