//! Streaming-related error types.
//!
//! Errors that occur while opening or reading the chat response stream,
//! plus the non-fatal protocol violation reported by the event extractor.

use thiserror::Error;

use crate::traits::HttpError;

/// Text shown in place of an answer whenever the stream cannot be read.
pub const CONNECTION_FALLBACK: &str = "I'm having trouble connecting right now.";

/// Failure opening or reading the byte stream of one exchange.
///
/// Ends the exchange in the `Failed` phase. Never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StreamError {
    /// The request could not be sent, the server answered with a
    /// non-success status, the body read failed part-way, or no body data
    /// arrived within the read timeout.
    #[error("chat stream failed: {0}")]
    Http(#[from] HttpError),
}

impl StreamError {
    /// Get the user-facing message for this error.
    ///
    /// Always the fixed fallback; transport details only go to the log.
    pub fn user_message(&self) -> &'static str {
        CONNECTION_FALLBACK
    }

    /// HTTP status code when the server rejected the request.
    pub fn status(&self) -> Option<u16> {
        match self {
            StreamError::Http(HttpError::ServerError { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// A non-blank line that is neither a `data:` frame nor a reserved SSE field.
///
/// Reported by the extractor and skipped; one bad line never aborts a stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized stream line: {line:?}")]
pub struct ProtocolViolation {
    pub line: String,
}
