//! Configuration structures for FortiZTP Cloud clients.
//!
//! This module provides the connection-level configuration consumed by the
//! HTTP transport, with validation and the documented defaults.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://fortiztp.forticloud.com/public/api";

/// Default OAuth token endpoint.
pub const DEFAULT_AUTH_URL: &str = "https://customerapiauth.fortinet.com/api/v1/oauth/token/";

/// Default OAuth client id.
pub const DEFAULT_CLIENT_ID: &str = "fortiztp";

/// Default maximum number of retry attempts.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default read timeout in seconds.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 300;

/// Connection configuration for a FortiZTP client instance.
///
/// Controls how the transport reaches the cloud API: endpoints, TLS
/// verification, timeouts, retry budget, and the client-side safety switches.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConnectionConfig {
    /// API base URL
    #[validate(url)]
    pub base_url: String,

    /// OAuth token endpoint. `None` uses the FortiCloud default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,

    /// Whether to verify TLS certificates
    #[serde(default = "default_verify")]
    pub verify: bool,

    /// Maximum number of retry attempts for transient failures
    #[validate(range(min = 0, max = 10))]
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Connect timeout in seconds
    #[validate(range(min = 1, max = 60))]
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Read timeout in seconds
    #[validate(range(min = 1, max = 3600))]
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,

    /// Reject all mutating operations before any network call
    #[serde(default)]
    pub read_only: bool,

    /// Emit an audit record for every operation
    #[serde(default)]
    pub track_operations: bool,
}

const fn default_verify() -> bool {
    true
}

const fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

const fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

const fn default_read_timeout_secs() -> u64 {
    DEFAULT_READ_TIMEOUT_SECS
}

impl ConnectionConfig {
    /// Create a configuration for the given base URL with all defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or validation fails.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            base_url: base_url.into(),
            auth_url: None,
            verify: default_verify(),
            max_retries: default_max_retries(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
            read_only: false,
            track_operations: false,
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Set the OAuth token endpoint.
    #[must_use]
    pub fn with_auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.auth_url = Some(auth_url.into());
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Set the maximum retry attempts.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the connect timeout in seconds.
    #[must_use]
    pub const fn with_connect_timeout(mut self, seconds: u64) -> Self {
        self.connect_timeout_secs = seconds;
        self
    }

    /// Set the read timeout in seconds.
    #[must_use]
    pub const fn with_read_timeout(mut self, seconds: u64) -> Self {
        self.read_timeout_secs = seconds;
        self
    }

    /// Enable or disable read-only mode.
    #[must_use]
    pub const fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Enable or disable operation tracking.
    #[must_use]
    pub const fn with_track_operations(mut self, track: bool) -> Self {
        self.track_operations = track;
        self
    }

    /// Get the connect timeout as a Duration.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Get the read timeout as a Duration.
    #[must_use]
    pub const fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Re-run field validation, for configurations assembled by hand.
    ///
    /// # Errors
    ///
    /// Returns an error if any field is out of range or the base URL is
    /// invalid.
    pub fn validate_settings(&self) -> Result<(), Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))
    }

    /// Parse and validate the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_base_url(&self) -> Result<Url, Error> {
        Url::parse(&self.base_url)
            .map_err(|e| Error::ConfigError(format!("Invalid base URL: {e}")))
    }

    /// Return the effective token endpoint.
    #[must_use]
    pub fn effective_auth_url(&self) -> &str {
        self.auth_url.as_deref().unwrap_or(DEFAULT_AUTH_URL)
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_url: None,
            verify: default_verify(),
            max_retries: default_max_retries(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
            read_only: false,
            track_operations: false,
        }
    }
}
