//! Lines to chat events.
//!
//! Grammar, applied per line:
//! - `data:<payload>` where `payload.trim() == "STREAM_END"` is a termination
//! - any other `data:<payload>` is a chunk carrying `payload + "\n"`
//! - blank lines and reserved SSE fields (`event:`, `id:`, `retry:`, `:`)
//!   are ignored
//! - anything else is a [`ProtocolViolation`], also ignored by the stream
//!   adapter

use futures_util::stream::{self, Stream, StreamExt};

use crate::error::ProtocolViolation;

/// Prefix of every meaningful frame.
pub const DATA_PREFIX: &str = "data:";

/// Payload signalling normal end of the answer.
pub const STREAM_END: &str = "STREAM_END";

const RESERVED_FIELDS: [&str; 4] = ["event:", "id:", "retry:", ":"];

/// One classified wire line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireLine<'a> {
    /// `data:` frame; the payload is everything after the five-byte prefix
    Data(&'a str),
    /// Blank keep-alive or reserved SSE field
    Ignored,
}

/// Event produced for the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireEvent {
    /// Text to append to the in-progress message, newline restored
    Chunk(String),
    /// The sentinel payload was received
    Termination,
}

/// Classify a single line (delimiter already removed).
pub fn parse_wire_line(line: &str) -> Result<WireLine<'_>, ProtocolViolation> {
    if let Some(payload) = line.strip_prefix(DATA_PREFIX) {
        return Ok(WireLine::Data(payload));
    }
    if line.trim().is_empty() || RESERVED_FIELDS.iter().any(|f| line.starts_with(f)) {
        return Ok(WireLine::Ignored);
    }
    Err(ProtocolViolation {
        line: line.to_string(),
    })
}

/// Stateful extractor: nothing is emitted once a termination was seen.
#[derive(Debug, Default)]
pub struct EventExtractor {
    terminated: bool,
}

impl EventExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Feed one line.
    ///
    /// The sentinel is checked on the raw payload, before any newline is
    /// re-appended, so it never becomes content.
    pub fn feed(&mut self, line: &str) -> Result<Option<WireEvent>, ProtocolViolation> {
        if self.terminated {
            return Ok(None);
        }
        match parse_wire_line(line)? {
            WireLine::Data(payload) if payload.trim() == STREAM_END => {
                self.terminated = true;
                Ok(Some(WireEvent::Termination))
            }
            WireLine::Data(payload) => {
                let mut chunk = String::with_capacity(payload.len() + 1);
                chunk.push_str(payload);
                chunk.push('\n');
                Ok(Some(WireEvent::Chunk(chunk)))
            }
            WireLine::Ignored => {
                tracing::trace!("Ignoring stream line: {:?}", line);
                Ok(None)
            }
        }
    }
}

/// Turn a stream of lines into a stream of events.
///
/// Protocol violations are logged and skipped. The stream ends right after
/// yielding [`WireEvent::Termination`], without polling the source again.
pub fn extract_events<S, E>(source: S) -> impl Stream<Item = Result<WireEvent, E>>
where
    S: Stream<Item = Result<String, E>> + Unpin,
{
    stream::unfold(
        Some((source, EventExtractor::new())),
        |state| async move {
            let (mut source, mut extractor) = state?;
            loop {
                match source.next().await {
                    Some(Ok(line)) => match extractor.feed(&line) {
                        Ok(Some(event)) => {
                            let next = if extractor.is_terminated() {
                                None
                            } else {
                                Some((source, extractor))
                            };
                            return Some((Ok(event), next));
                        }
                        Ok(None) => {}
                        Err(violation) => tracing::debug!("{}", violation),
                    },
                    Some(Err(e)) => return Some((Err(e), None)),
                    None => return None,
                }
            }
        },
    )
}
