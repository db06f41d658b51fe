//! Byte buffers to UTF-8 text fragments.
//!
//! Network reads split the body at arbitrary byte offsets, so a multi-byte
//! character can arrive half in one buffer and half in the next. The
//! decoder holds the incomplete tail of each buffer and prefixes it to the
//! next one before decoding.

use bytes::Bytes;
use futures_util::stream::{self, Stream, StreamExt};

/// Incremental UTF-8 decoder.
///
/// Invalid sequences (as opposed to incomplete ones) are replaced with
/// U+FFFD and decoding continues.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of `pending ++ bytes` as forms complete characters.
    ///
    /// An incomplete trailing sequence (at most 3 bytes) is retained for the
    /// next call. Returns an empty string when nothing is decodable yet.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);

        let mut out = String::with_capacity(self.pending.len());
        let mut start = 0;
        while start < self.pending.len() {
            let rest = &self.pending[start..];
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    out.push_str(text);
                    start = self.pending.len();
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    // The prefix is valid UTF-8, so this borrows without replacement.
                    out.push_str(&String::from_utf8_lossy(&rest[..valid]));
                    match err.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            start += valid + len;
                        }
                        None => {
                            start += valid;
                            break;
                        }
                    }
                }
            }
        }

        self.pending.drain(..start);
        out
    }

    /// Number of bytes held back waiting for the rest of a character.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Flush whatever is still buffered at end of data.
    ///
    /// A truncated character cannot be completed any more, so it decodes
    /// lossily. Returns `None` when nothing was pending.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let tail = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        Some(tail)
    }
}

/// Turn a stream of byte buffers into a stream of decoded text fragments.
///
/// Errors from the source are passed through and end the sequence. Empty
/// fragments are not emitted. At natural end the decoder is flushed.
pub fn decode_fragments<S, E>(source: S) -> impl Stream<Item = Result<String, E>>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
{
    stream::unfold(
        Some((source, Utf8Decoder::new())),
        |state| async move {
            let (mut source, mut decoder) = state?;
            loop {
                match source.next().await {
                    Some(Ok(chunk)) => {
                        let fragment = decoder.decode(&chunk);
                        if !fragment.is_empty() {
                            return Some((Ok(fragment), Some((source, decoder))));
                        }
                    }
                    Some(Err(e)) => return Some((Err(e), None)),
                    None => return decoder.finish().map(|tail| (Ok(tail), None)),
                }
            }
        },
    )
}
