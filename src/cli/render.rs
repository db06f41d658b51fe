//! Plain-text transcript rendering for the terminal front end.
//!
//! Assistant text is printed as it streams. When a message is sealed with
//! text other than what was streamed (a failed exchange replaces partial
//! text with the fallback), the partial output is marked as discarded and
//! the final text is printed in its place.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::models::{Message, MessageRole};
use crate::state::ConversationUpdate;
use crate::traits::ConversationObserver;

/// Printed after streamed text that the final message does not keep.
pub const DISCARDED_MARKER: &str = "[answer interrupted]";

/// First write error seen by a [`TranscriptPrinter`], shared with its owner.
#[derive(Debug, Clone, Default)]
pub struct OutputStatus(Arc<Mutex<Option<io::Error>>>);

impl OutputStatus {
    /// Take the recorded write error, if any.
    pub fn take_error(&self) -> Option<io::Error> {
        self.0.lock().ok().and_then(|mut slot| slot.take())
    }

    fn record(&self, error: io::Error) {
        if let Ok(mut slot) = self.0.lock() {
            if slot.is_none() {
                *slot = Some(error);
            }
        }
    }

    fn is_failed(&self) -> bool {
        self.0.lock().map(|slot| slot.is_some()).unwrap_or(true)
    }
}

/// Conversation observer that writes assistant messages to `out`.
///
/// User messages are not echoed. Once a write fails nothing more is
/// written and the error is left in [`OutputStatus`].
pub struct TranscriptPrinter<W> {
    out: W,
    /// Text written so far for the in-progress message
    streamed: String,
    status: OutputStatus,
}

impl<W: Write> TranscriptPrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            streamed: String::new(),
            status: OutputStatus::default(),
        }
    }

    /// Handle for checking write failures after the printer is boxed.
    pub fn status(&self) -> OutputStatus {
        self.status.clone()
    }

    /// Write a complete message followed by a blank line.
    pub fn print_message(&mut self, message: &Message) -> io::Result<()> {
        write_block(&mut self.out, &message.text)?;
        self.out.flush()
    }

    fn render(&mut self, update: &ConversationUpdate, messages: &[Message]) -> io::Result<()> {
        match update {
            ConversationUpdate::Appended { index, role } => {
                let Some(message) = messages.get(*index) else {
                    return Ok(());
                };
                if message.is_streaming {
                    self.streamed.clear();
                } else if *role == MessageRole::Assistant {
                    write_block(&mut self.out, &message.text)?;
                }
            }
            ConversationUpdate::Delta { fragment, .. } => {
                self.out.write_all(fragment.as_bytes())?;
                self.streamed.push_str(fragment);
            }
            ConversationUpdate::Sealed { index } => {
                let streamed = std::mem::take(&mut self.streamed);
                let Some(message) = messages.get(*index) else {
                    return Ok(());
                };
                if message.text == streamed {
                    if !streamed.is_empty() && !streamed.ends_with('\n') {
                        writeln!(self.out)?;
                    }
                    writeln!(self.out)?;
                } else {
                    if !streamed.is_empty() {
                        if !streamed.ends_with('\n') {
                            writeln!(self.out)?;
                        }
                        writeln!(self.out, "{}", DISCARDED_MARKER)?;
                    }
                    write_block(&mut self.out, &message.text)?;
                }
            }
        }
        self.out.flush()
    }
}

fn write_block<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        writeln!(out)?;
    }
    writeln!(out)
}

impl<W: Write + Send> ConversationObserver for TranscriptPrinter<W> {
    fn on_update(&mut self, update: &ConversationUpdate, messages: &[Message]) {
        if self.status.is_failed() {
            return;
        }
        if let Err(e) = self.render(update, messages) {
            tracing::warn!("Stopping transcript output: {}", e);
            self.status.record(e);
        }
    }
}
