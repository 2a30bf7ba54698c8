//! Transport seam for range requests.
//!
//! The state machine talks to the network only through [`RangeFetch`], so
//! its protocol logic is testable against scripted responses. The
//! production implementation is [`CurlFetcher`].

mod content_range;
mod curl;
mod parse;

pub use self::curl::CurlFetcher;
pub use content_range::{parse_content_range, ContentRange};
pub use parse::{parse_response_headers, ResponseHeaders};

use thiserror::Error;

/// Transport-level failure: DNS, connect, reset, stall, timeout. Anything
/// the server *said* (status, headers) is not a `FetchError`; it comes back
/// in the [`RangeResponse`] for the state machine to judge.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct FetchError(pub String);

impl From<::curl::Error> for FetchError {
    fn from(e: ::curl::Error) -> Self {
        FetchError(e.to_string())
    }
}

/// One response to an open-ended range request.
#[derive(Debug, Clone)]
pub struct RangeResponse {
    /// HTTP status of the final response (after redirects).
    pub status: u32,
    /// `Content-Type` value, if present.
    pub content_type: Option<String>,
    /// Parsed `Content-Range`, if present and well-formed.
    pub content_range: Option<ContentRange>,
    /// Response body.
    pub body: Vec<u8>,
}

/// Issues one `Range: bytes=<offset>-` GET and returns the raw outcome.
pub trait RangeFetch: Send + Sync {
    fn fetch_range(&self, locator: &str, offset: u64) -> Result<RangeResponse, FetchError>;
}
