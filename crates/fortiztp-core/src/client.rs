//! HTTP transport, retry logic and statistics.
//!
//! This module provides the shared transport every endpoint method goes
//! through: one logical call maps to one [`HttpTransport::execute`]
//! invocation, which performs at most `1 + max_retries` HTTP exchanges and
//! classifies failures into the SDK error taxonomy.

use crate::audit::{AuditOutcome, AuditRecord, AuditSink};
use crate::auth::{Credentials, TokenState};
use crate::config::ConnectionConfig;
use crate::error::{Error, ErrorPayload, Result};
use chrono::Utc;
use reqwest::{ClientBuilder, Method, StatusCode};
use secrecy::SecretString;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

const USER_AGENT: &str = concat!("fortiztp-rust/", env!("CARGO_PKG_VERSION"));

/// Default initial retry delay in milliseconds.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// Default maximum retry delay in milliseconds (cap for exponential backoff).
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 5000;

/// Retry policy with exponential backoff.
///
/// Governs how transient failures are retried. Only throttling, 5xx and
/// timeout failures are eligible; everything else surfaces immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts
    pub max_retries: u32,

    /// Initial delay before first retry
    pub initial_delay: Duration,

    /// Maximum delay between retries
    pub max_delay: Duration,

    /// Backoff multiplier
    pub backoff_multiplier: u32,
}

impl RetryPolicy {
    /// Create a retry policy with the documented defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: crate::config::DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_RETRY_MAX_DELAY_MS),
            backoff_multiplier: 2,
        }
    }

    /// Create a policy that never retries.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
            backoff_multiplier: 1,
        }
    }

    /// Set the maximum number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the initial delay.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Calculate the backoff delay for a given attempt number.
    ///
    /// Uses exponential backoff: `min(initial * multiplier^(attempt-1), max)`.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::from_secs(0);
        }

        let multiplier = self.backoff_multiplier.saturating_pow(attempt - 1);
        let delay_ms = self.initial_delay.as_millis() as u64 * u64::from(multiplier);
        std::cmp::min(Duration::from_millis(delay_ms), self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Atomic counters tracking call outcomes since client construction.
#[derive(Debug, Default)]
pub struct RetryStats {
    total_requests: AtomicU64,
    successful_requests: AtomicU64,
    failed_requests: AtomicU64,
    total_retries: AtomicU64,
}

impl RetryStats {
    fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    fn record_success(&self) {
        self.successful_requests.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failure(&self) {
        self.failed_requests.fetch_add(1, Ordering::Relaxed);
    }

    fn record_retry(&self) {
        self.total_retries.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a consistent-enough snapshot of the counters.
    #[must_use]
    pub fn snapshot(&self) -> RetryStatsSnapshot {
        RetryStatsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            total_retries: self.total_retries.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of the retry statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryStatsSnapshot {
    /// Logical calls issued.
    pub total_requests: u64,
    /// Calls that ultimately succeeded.
    pub successful_requests: u64,
    /// Calls that ultimately failed.
    pub failed_requests: u64,
    /// Individual retry attempts across all calls.
    pub total_retries: u64,
}

/// Request body accepted by the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON payload.
    Json(serde_json::Value),
    /// Opaque text payload (script content transfer).
    Text(String),
}

/// Raw result of one completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Untouched response body text.
    pub body: String,
    /// Elapsed wall-clock time of the final attempt.
    pub elapsed: Duration,
}

/// How the transport authenticates.
pub enum AuthMethod {
    /// Password-grant login via the FortiCloud token endpoint.
    Credentials(Credentials),
    /// Pre-obtained bearer token.
    Token(SecretString),
}

/// Shared HTTP transport for the FortiZTP Cloud API.
///
/// Owns the `reqwest` client, the token state, the retry budget and the
/// statistics. All SDK namespaces hold an `Arc` of one transport; it carries
/// no mutable state beyond the token cache, the counters and the logged-out
/// flag, all updated atomically.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
    tokens: TokenState,
    retry_policy: RetryPolicy,
    stats: RetryStats,
    read_only: bool,
    track_operations: bool,
    audit: Option<Arc<dyn AuditSink>>,
    user_context: Option<serde_json::Value>,
    closed: AtomicBool,
}

impl HttpTransport {
    /// Build a transport from the connection configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`Error::ConfigError`] when the base URL is invalid or the
    /// underlying HTTP client cannot be constructed.
    pub fn new(
        config: &ConnectionConfig,
        auth: AuthMethod,
        audit: Option<Arc<dyn AuditSink>>,
        user_context: Option<serde_json::Value>,
    ) -> Result<Self> {
        let mut base_url = config.parse_base_url()?;
        // Url::join treats a base without a trailing slash as a file path.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut builder = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .connect_timeout(config.connect_timeout())
            .timeout(config.read_timeout());

        if !config.verify {
            warn!("TLS verification disabled for FortiZTP client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        let tokens = match auth {
            AuthMethod::Credentials(credentials) => TokenState::from_credentials(
                credentials,
                config.effective_auth_url(),
                http.clone(),
            ),
            AuthMethod::Token(token) => TokenState::from_token(token, http.clone()),
        };

        Ok(Self {
            http,
            base_url,
            tokens,
            retry_policy: RetryPolicy::new().with_max_retries(config.max_retries),
            stats: RetryStats::default(),
            read_only: config.read_only,
            track_operations: config.track_operations,
            audit,
            user_context,
            closed: AtomicBool::new(false),
        })
    }

    /// Return the API base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Return a snapshot of the retry statistics.
    #[must_use]
    pub fn retry_stats(&self) -> RetryStatsSnapshot {
        self.stats.snapshot()
    }

    /// Returns true once [`HttpTransport::logout`] has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Invalidate the held token and refuse further calls.
    ///
    /// Idempotent; returns true only for the call that performed the
    /// teardown. Callers must not interleave logout with in-flight calls.
    pub fn logout(&self) -> bool {
        if self.closed.swap(true, Ordering::SeqCst) {
            return false;
        }

        self.tokens.invalidate();
        self.emit_audit("logout", "LOCAL", "", &[], AuditOutcome::Local, 0);
        true
    }

    /// Perform one logical API call.
    ///
    /// Issues at most `1 + max_retries` HTTP exchanges, retrying only
    /// transient failures, and returns the raw status/body/elapsed triple for
    /// the caller to decode.
    pub async fn execute(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
        body: Option<RequestBody>,
    ) -> Result<RawResponse> {
        if self.is_closed() {
            return Err(Error::ValidationError(
                "client is logged out; construct a new client".to_string(),
            ));
        }

        if self.read_only && method != Method::GET {
            let reason = format!("{operation} rejected: client is in read-only mode");
            self.emit_audit(
                operation,
                method.as_str(),
                path,
                params,
                AuditOutcome::Rejected(reason.clone()),
                0,
            );
            return Err(Error::ValidationError(reason));
        }

        self.stats.record_request();

        let url = self.build_url(path)?;
        let mut attempt: u32 = 0;
        let mut retries: u32 = 0;

        loop {
            let bearer = match self.tokens.bearer_token().await {
                Ok(bearer) => bearer,
                Err(err) => {
                    self.finish_failure(operation, &method, path, params, retries, &err);
                    return Err(err);
                }
            };

            let mut request = self
                .http
                .request(method.clone(), url.clone())
                .query(&params)
                .bearer_auth(bearer)
                .header("Accept", "application/json");

            request = match &body {
                Some(RequestBody::Json(payload)) => request.json(payload),
                Some(RequestBody::Text(text)) => request
                    .header("Content-Type", "text/plain")
                    .body(text.clone()),
                None => request,
            };

            info!(operation, path, attempt, "Sending FortiZTP request");
            let started = Instant::now();

            let error = match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    match response.text().await {
                        Ok(text) => {
                            let elapsed = started.elapsed();

                            if status.is_success() {
                                self.stats.record_success();
                                self.emit_audit(
                                    operation,
                                    method.as_str(),
                                    path,
                                    params,
                                    AuditOutcome::Success(status.as_u16()),
                                    retries,
                                );
                                return Ok(RawResponse {
                                    status,
                                    body: text,
                                    elapsed,
                                });
                            }

                            map_status_to_error(status, &text)
                        }
                        // Not retryable: falls through to the terminal error
                        // handling below so the failure is counted and audited.
                        Err(err) => {
                            Error::ParseError(format!("Failed to read response body: {err}"))
                        }
                    }
                }
                Err(err) => Error::from(err),
            };

            if !error.is_retryable() || attempt >= self.retry_policy.max_retries {
                self.finish_failure(operation, &method, path, params, retries, &error);
                return Err(error);
            }

            attempt += 1;
            retries += 1;
            self.stats.record_retry();

            let delay = self.retry_policy.delay_for_attempt(attempt);
            debug!(operation, attempt, ?delay, "Retrying FortiZTP request");
            if delay > Duration::from_millis(0) {
                sleep(delay).await;
            }
        }
    }

    fn finish_failure(
        &self,
        operation: &'static str,
        method: &Method,
        path: &str,
        params: &[(&'static str, String)],
        retries: u32,
        error: &Error,
    ) {
        self.stats.record_failure();
        self.emit_audit(
            operation,
            method.as_str(),
            path,
            params,
            AuditOutcome::Failure(error.error_code().to_string()),
            retries,
        );
    }

    fn emit_audit(
        &self,
        operation: &str,
        method: &str,
        path: &str,
        params: &[(&'static str, String)],
        outcome: AuditOutcome,
        retries: u32,
    ) {
        if !self.track_operations {
            return;
        }
        let Some(sink) = &self.audit else {
            return;
        };

        sink.record(&AuditRecord {
            operation: operation.to_string(),
            method: method.to_string(),
            path: path.to_string(),
            params: params
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
            outcome,
            retries,
            timestamp: Utc::now(),
            user_context: self.user_context.clone(),
        });
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid path `{path}`: {err}")))
    }
}

fn map_status_to_error(status: StatusCode, text: &str) -> Error {
    let detail = ErrorPayload::from_body(text)
        .map_or_else(|| text.to_string(), |payload| payload.describe());

    match status {
        StatusCode::NOT_FOUND => Error::NotFound(detail),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::AuthenticationFailed(detail),
        StatusCode::TOO_MANY_REQUESTS => Error::RateLimited(detail),
        status if status.is_server_error() => {
            Error::ServiceUnavailable(format!("server error {status}: {detail}"))
        }
        status => Error::HttpError(format!("unexpected status {status}: {detail}")),
    }
}
