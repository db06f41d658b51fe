//! Scripted response bodies for test fixtures.

pub use streamchat::adapters::mock::{MockHttpClient, MockResponse};
pub use streamchat::traits::HttpError;

use bytes::Bytes;

/// Turn string slices into owned byte buffers.
#[allow(dead_code)]
pub fn chunks(parts: &[&str]) -> Vec<Bytes> {
    parts.iter().map(|p| Bytes::from(p.to_string())).collect()
}

/// Split `body` into buffers at the given byte offsets.
#[allow(dead_code)]
pub fn split_at(body: &[u8], offsets: &[usize]) -> Vec<Bytes> {
    let mut buffers = Vec::new();
    let mut start = 0;
    for &offset in offsets {
        buffers.push(Bytes::copy_from_slice(&body[start..offset]));
        start = offset;
    }
    buffers.push(Bytes::copy_from_slice(&body[start..]));
    buffers
}

/// A client that answers every URL with `buffers`, then ends the body.
#[allow(dead_code)]
pub fn scripted_client(buffers: Vec<Bytes>) -> MockHttpClient {
    let client = MockHttpClient::new();
    client.set_default_response(MockResponse::Stream(buffers));
    client
}

/// A client whose every request fails before a response arrives.
#[allow(dead_code)]
pub fn failing_client(error: HttpError) -> MockHttpClient {
    let client = MockHttpClient::new();
    client.set_default_response(MockResponse::Error(error));
    client
}
