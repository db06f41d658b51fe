//! Chat response stream decoding.
//!
//! The response body is a sequence of newline-terminated UTF-8 lines; only
//! `data:` lines carry content and the payload `STREAM_END` closes the
//! answer. Decoding runs in three lazy stages:
//!
//! - `decoder` - byte buffers to text, safe across split characters
//! - `framer` - text to complete lines
//! - `extractor` - lines to [`WireEvent`]s
//!
//! [`wire_events`] composes them over an HTTP body stream.

pub mod decoder;
pub mod extractor;
pub mod framer;

pub use decoder::{decode_fragments, Utf8Decoder};
pub use extractor::{
    extract_events, parse_wire_line, EventExtractor, WireEvent, WireLine, DATA_PREFIX, STREAM_END,
};
pub use framer::{frame_lines, LineFramer};

use futures_util::stream::Stream;
use std::pin::Pin;

use crate::error::StreamError;
use crate::traits::ByteStream;

/// Stream of chat events decoded from one response body.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<WireEvent, StreamError>> + Send>>;

/// Decode a response body into chat events.
///
/// Ends after a termination event, at natural end of the body, or after
/// yielding the first read error.
pub fn wire_events(body: ByteStream) -> EventStream {
    let fragments = Box::pin(decode_fragments(body));
    let lines = Box::pin(frame_lines(fragments));
    let events = extract_events(lines);
    Box::pin(futures_util::StreamExt::map(events, |item| {
        item.map_err(StreamError::from)
    }))
}
