//! Mock HTTP client for testing.
//!
//! Returns scripted byte streams or errors per URL and records every
//! request for verification.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body
    pub body: Option<String>,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Fail before any body arrives (connection refused, bad status)
    Error(HttpError),
    /// Deliver these buffers, then end normally
    Stream(Vec<Bytes>),
    /// Deliver these buffers, then fail the read
    StreamThenError(Vec<Bytes>, HttpError),
    /// Deliver these buffers, then never yield again
    StreamThenHang(Vec<Bytes>),
}

/// Mock HTTP client for testing.
///
/// Clones share configuration and recorded requests.
///
/// # Example
///
/// ```ignore
/// use streamchat::adapters::mock::{MockHttpClient, MockResponse};
/// use bytes::Bytes;
///
/// let client = MockHttpClient::new();
/// client.set_response(
///     "http://localhost:8080/api/chat",
///     MockResponse::Stream(vec![Bytes::from("data:Hi\n")]),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// Configured responses by URL pattern
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a URL. Exact matches win, then the longest
    /// matching prefix.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap();
        *default = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record_request(&self, method: &str, url: &str, headers: &Headers, body: Option<String>) {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        let responses = self.responses.lock().unwrap();

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        let prefixed = responses
            .iter()
            .filter(|(pattern, _)| url.starts_with(pattern.as_str()))
            .max_by_key(|(pattern, _)| pattern.len());
        if let Some((_, response)) = prefixed {
            return Some(response.clone());
        }

        let default = self.default_response.lock().unwrap();
        default.clone()
    }
}

fn ok_chunks(chunks: Vec<Bytes>) -> impl futures::Stream<Item = Result<Bytes, HttpError>> {
    futures::stream::iter(chunks.into_iter().map(Ok))
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        use futures::StreamExt;

        self.record_request("POST", url, headers, Some(body.to_string()));

        match self.get_response(url) {
            Some(MockResponse::Stream(chunks)) => Ok(Box::pin(ok_chunks(chunks))),
            Some(MockResponse::StreamThenError(chunks, err)) => Ok(Box::pin(
                ok_chunks(chunks).chain(futures::stream::once(async move { Err(err) })),
            )),
            Some(MockResponse::StreamThenHang(chunks)) => {
                Ok(Box::pin(ok_chunks(chunks).chain(futures::stream::pending())))
            }
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    async fn drain(mut stream: ByteStream) -> Vec<Result<Bytes, HttpError>> {
        let mut items = Vec::new();
        while let Some(item) = stream.next().await {
            items.push(item);
        }
        items
    }

    #[tokio::test]
    async fn test_post_stream_with_chunks() {
        let client = MockHttpClient::new();
        client.set_response(
            "https://example.com/stream",
            MockResponse::Stream(vec![Bytes::from("chunk1"), Bytes::from("chunk2")]),
        );

        let stream = client
            .post_stream("https://example.com/stream", "{}", &Headers::new())
            .await
            .unwrap();

        let items = drain(stream).await;
        assert_eq!(items, vec![Ok(Bytes::from("chunk1")), Ok(Bytes::from("chunk2"))]);
    }

    #[tokio::test]
    async fn test_stream_then_error() {
        let client = MockHttpClient::new();
        client.set_response(
            "https://example.com/stream",
            MockResponse::StreamThenError(
                vec![Bytes::from("a")],
                HttpError::Io("reset".to_string()),
            ),
        );

        let stream = client
            .post_stream("https://example.com/stream", "{}", &Headers::new())
            .await
            .unwrap();

        let items = drain(stream).await;
        assert_eq!(
            items,
            vec![Ok(Bytes::from("a")), Err(HttpError::Io("reset".to_string()))]
        );
    }

    #[tokio::test]
    async fn test_error_response() {
        let client = MockHttpClient::new();
        client.set_response(
            "https://example.com/chat",
            MockResponse::Error(HttpError::ServerError {
                status: 500,
                message: "Internal Server Error".to_string(),
            }),
        );

        let result = client
            .post_stream("https://example.com/chat", "{}", &Headers::new())
            .await;
        assert!(matches!(
            result,
            Err(HttpError::ServerError { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_no_response_configured() {
        let client = MockHttpClient::new();
        let result = client
            .post_stream("https://example.com/missing", "{}", &Headers::new())
            .await;
        assert!(matches!(result, Err(HttpError::Other(_))));
    }

    #[tokio::test]
    async fn test_prefix_and_default_match() {
        let client = MockHttpClient::new();
        client.set_response("https://example.com/api", MockResponse::Stream(vec![]));
        client.set_default_response(MockResponse::Error(HttpError::Timeout("t".to_string())));

        assert!(client
            .post_stream("https://example.com/api/chat", "{}", &Headers::new())
            .await
            .is_ok());
        assert!(matches!(
            client
                .post_stream("https://other.example/chat", "{}", &Headers::new())
                .await,
            Err(HttpError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn test_longest_prefix_wins() {
        let client = MockHttpClient::new();
        let other = |m: &str| MockResponse::Error(HttpError::Other(m.to_string()));
        client.set_response("https://example.com", other("short"));
        client.set_response("https://example.com/api/chat", MockResponse::Stream(vec![]));
        client.set_response("https://example.com/api", other("mid"));

        for _ in 0..8 {
            assert!(client
                .post_stream("https://example.com/api/chat/v2", "{}", &Headers::new())
                .await
                .is_ok());
        }
        assert!(matches!(
            client
                .post_stream("https://example.com/api/other", "{}", &Headers::new())
                .await,
            Err(HttpError::Other(ref m)) if m == "mid"
        ));
    }

    #[tokio::test]
    async fn test_requests_recorded_and_shared_by_clones() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::Stream(vec![]));
        let cloned = client.clone();

        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "text/event-stream".to_string());
        let _ = cloned
            .post_stream("https://example.com/chat", r#"{"message":"hi"}"#, &headers)
            .await;

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].body.as_deref(), Some(r#"{"message":"hi"}"#));
        assert_eq!(
            requests[0].headers.get("Accept"),
            Some(&"text/event-stream".to_string())
        );
        assert_eq!(cloned.get_requests().len(), 1);
    }
}
