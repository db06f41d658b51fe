//! HTTP client trait abstraction.
//!
//! The chat core only ever needs one outbound call: a POST whose response
//! body is consumed incrementally. Keeping it behind a trait lets the
//! session controller run against scripted byte streams in tests.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// A streamed response body: byte buffers in arrival order, or the error
/// that ended the read.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// HTTP client errors.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpError {
    /// Connection failed
    ConnectionFailed(String),
    /// Request timeout
    Timeout(String),
    /// Server returned a non-success status
    ServerError { status: u16, message: String },
    /// Reading the response body failed part-way
    Io(String),
    /// Invalid URL
    InvalidUrl(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            HttpError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            HttpError::ServerError { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            HttpError::Io(msg) => write!(f, "IO error: {}", msg),
            HttpError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            HttpError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// Trait for the streaming HTTP call the chat exchange is built on.
///
/// Implementations must return `Err` for any non-success status instead of
/// handing back the error body as a stream.
///
/// # Example
///
/// ```ignore
/// use streamchat::traits::{Headers, HttpClient};
///
/// async fn first_buffer<C: HttpClient>(client: &C) -> Option<bytes::Bytes> {
///     use futures_util::StreamExt;
///     let mut body = client.post_stream("http://localhost:8080/api/chat", "{}", &Headers::new()).await.ok()?;
///     body.next().await?.ok()
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a POST request and return the response body as a byte stream.
    ///
    /// # Arguments
    /// * `url` - The URL to request
    /// * `body` - Request body as a string
    /// * `headers` - Request headers
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError>;
}
