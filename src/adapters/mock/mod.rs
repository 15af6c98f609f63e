//! Mock implementations for testing.
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses and a request log

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
