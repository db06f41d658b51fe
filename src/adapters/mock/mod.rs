//! Mock implementations for testing.
//!
//! Lets the session and decoding layers be exercised without a network.

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
