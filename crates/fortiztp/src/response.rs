//! Typed response envelope returned by every endpoint method.

use std::ops::Deref;
use std::time::Duration;

use reqwest::StatusCode;

/// Decoded API response plus transport metadata.
///
/// Derefs to the decoded body, so `response.total` works directly on a
/// `ApiResponse<Page<Device>>`. The metadata accessors expose what the
/// body alone cannot: the HTTP status, elapsed wall time, and the raw
/// response text before decoding.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    body: T,
    status: StatusCode,
    elapsed: Duration,
    raw: String,
}

impl<T> ApiResponse<T> {
    pub(crate) fn new(body: T, status: StatusCode, elapsed: Duration, raw: String) -> Self {
        Self {
            body,
            status,
            elapsed,
            raw,
        }
    }

    /// The decoded response body.
    pub fn body(&self) -> &T {
        &self.body
    }

    /// Consume the envelope, yielding the decoded body.
    pub fn into_body(self) -> T {
        self.body
    }

    /// HTTP status code of the response.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.status
    }

    /// Wall time of the HTTP exchange that produced this response. Earlier
    /// retried attempts are not included.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// The response text exactly as received, before decoding.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl<T> Deref for ApiResponse<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.body
    }
}
