//! Error types for FortiZTP Cloud operations.
//!
//! This module provides the error hierarchy shared by all SDK crates,
//! including HTTP status code mapping and the structured error payload the
//! cloud API returns on failures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for FortiZTP Cloud operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A required parameter was missing or invalid, or a mutating call was
    /// attempted while the client is in read-only mode.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Credentials were rejected or a token refresh failed.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The server reported no matching record.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server throttled the request (HTTP 429).
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// The service returned a 5xx response.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The request timed out.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// HTTP request failed for a reason not otherwise classified.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Failed to decode a response body.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint URL or path.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Specialized result type for FortiZTP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error body returned by the cloud API on 4xx/5xx responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ErrorPayload {
    /// Error code string.
    #[serde(default)]
    pub error: Option<String>,

    /// Human-readable error description.
    #[serde(default)]
    pub error_description: Option<String>,
}

impl ErrorPayload {
    /// Attempt to decode an error payload from a raw response body.
    ///
    /// Returns `None` when the body is not the documented error shape, so
    /// callers can fall back to the raw text.
    #[must_use]
    pub fn from_body(body: &str) -> Option<Self> {
        let payload: Self = serde_json::from_str(body).ok()?;
        if payload.error.is_none() && payload.error_description.is_none() {
            None
        } else {
            Some(payload)
        }
    }

    /// Render the payload as a single diagnostic string.
    #[must_use]
    pub fn describe(&self) -> String {
        match (&self.error, &self.error_description) {
            (Some(code), Some(desc)) => format!("{code}: {desc}"),
            (Some(code), None) => code.clone(),
            (None, Some(desc)) => desc.clone(),
            (None, None) => "unknown error".to_string(),
        }
    }
}

impl Error {
    /// Returns the error code for this error kind.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::AuthenticationFailed(_) => "AUTHENTICATION_FAILED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::RateLimited(_) => "RATE_LIMITED",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Timeout(_) => "TIMEOUT",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
        }
    }

    /// Returns true when the transport layer may retry the failed exchange.
    ///
    /// Only throttling, 5xx responses and timeouts are retry-eligible.
    /// Validation and authentication failures always surface immediately.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited(_) | Self::ServiceUnavailable(_) | Self::Timeout(_)
        )
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}
