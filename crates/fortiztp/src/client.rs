//! FortiZTP Cloud API client facade.
//!
//! [`FortiZtp`] is the entry point: build one with [`FortiZtpBuilder`], then
//! reach the endpoint groups through the namespace accessors
//! ([`FortiZtp::devices`], [`FortiZtp::settings`], [`FortiZtp::system`]).
//! Namespaces are cheap handles over one shared transport, so cloning them
//! shares the token cache, retry budget and statistics.

use std::future::Future;
use std::sync::Arc;

use fortiztp_core::audit::AuditSink;
use fortiztp_core::auth::Credentials;
use fortiztp_core::client::{AuthMethod, HttpTransport, RequestBody, RetryStatsSnapshot};
use fortiztp_core::config::ConnectionConfig;
use fortiztp_core::{Error, Result};
use reqwest::Method;
use secrecy::SecretString;
use serde::de::DeserializeOwned;

use crate::devices::DevicesApi;
use crate::fortimanagers::FortiManagersApi;
use crate::response::ApiResponse;
use crate::scripts::ScriptsApi;
use crate::system::SystemApi;

/// Execute a call and decode the JSON body into `T`.
///
/// An empty body decodes as JSON `null`, which some mutate endpoints return
/// on success.
pub(crate) async fn fetch_json<T>(
    transport: &HttpTransport,
    operation: &'static str,
    method: Method,
    path: &str,
    params: &[(&'static str, String)],
    body: Option<RequestBody>,
) -> Result<ApiResponse<T>>
where
    T: DeserializeOwned,
{
    let raw = transport.execute(operation, method, path, params, body).await?;
    let text = if raw.body.trim().is_empty() {
        "null"
    } else {
        raw.body.as_str()
    };
    let decoded: T = serde_json::from_str(text)?;
    Ok(ApiResponse::new(decoded, raw.status, raw.elapsed, raw.body))
}

/// Execute a call and return the body as opaque text (script content).
pub(crate) async fn fetch_text(
    transport: &HttpTransport,
    operation: &'static str,
    method: Method,
    path: &str,
    body: Option<RequestBody>,
) -> Result<ApiResponse<String>> {
    let raw = transport.execute(operation, method, path, &[], body).await?;
    let body_text = raw.body.clone();
    Ok(ApiResponse::new(body_text, raw.status, raw.elapsed, raw.body))
}

/// Builder for [`FortiZtp`].
///
/// Exactly one authentication method must be supplied: either FortiCloud
/// IAM credentials or a pre-obtained OAuth token.
#[derive(Default)]
pub struct FortiZtpBuilder {
    config: ConnectionConfig,
    auth: Option<AuthMethod>,
    audit: Option<Arc<dyn AuditSink>>,
    user_context: Option<serde_json::Value>,
}

impl FortiZtpBuilder {
    /// Create a builder with default connection settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Authenticate with FortiCloud IAM credentials (password grant).
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.auth = Some(AuthMethod::Credentials(credentials));
        self
    }

    /// Authenticate with a pre-obtained OAuth bearer token.
    #[must_use]
    pub fn oauth_token(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(AuthMethod::Token(SecretString::from(token.into())));
        self
    }

    /// Override the API base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Override the token endpoint used for the password grant.
    #[must_use]
    pub fn auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.config.auth_url = Some(auth_url.into());
        self
    }

    /// Enable or disable TLS certificate verification.
    #[must_use]
    pub const fn verify(mut self, verify: bool) -> Self {
        self.config.verify = verify;
        self
    }

    /// Set the retry budget for transient failures.
    #[must_use]
    pub const fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    /// Set the connect timeout in seconds.
    #[must_use]
    pub const fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.config.connect_timeout_secs = secs;
        self
    }

    /// Set the read timeout in seconds.
    #[must_use]
    pub const fn read_timeout_secs(mut self, secs: u64) -> Self {
        self.config.read_timeout_secs = secs;
        self
    }

    /// Reject every non-GET call client-side before any network activity.
    #[must_use]
    pub const fn read_only(mut self, read_only: bool) -> Self {
        self.config.read_only = read_only;
        self
    }

    /// Enable per-operation audit records.
    #[must_use]
    pub const fn track_operations(mut self, track: bool) -> Self {
        self.config.track_operations = track;
        self
    }

    /// Attach a sink that receives audit records.
    ///
    /// Implies operation tracking.
    #[must_use]
    pub fn audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(sink);
        self.config.track_operations = true;
        self
    }

    /// Attach opaque caller context echoed into every audit record.
    #[must_use]
    pub fn user_context(mut self, context: serde_json::Value) -> Self {
        self.user_context = Some(context);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] when no authentication method was
    /// supplied or the connection settings fail validation.
    pub fn build(self) -> Result<FortiZtp> {
        let auth = self.auth.ok_or_else(|| {
            Error::ConfigError(
                "either credentials or an oauth token is required".to_string(),
            )
        })?;

        self.config.validate_settings()?;
        let transport = HttpTransport::new(&self.config, auth, self.audit, self.user_context)?;

        Ok(FortiZtp {
            transport: Arc::new(transport),
        })
    }
}

/// FortiZTP Cloud API client.
///
/// Immutable after construction and safe to share across tasks. All
/// namespace handles obtained from one client share its transport, so
/// [`FortiZtp::logout`] invalidates every handle at once.
#[derive(Clone)]
pub struct FortiZtp {
    transport: Arc<HttpTransport>,
}

impl std::fmt::Debug for FortiZtp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FortiZtp").finish_non_exhaustive()
    }
}

impl FortiZtp {
    /// Start building a client.
    #[must_use]
    pub fn builder() -> FortiZtpBuilder {
        FortiZtpBuilder::new()
    }

    /// Device provisioning endpoints.
    #[must_use]
    pub fn devices(&self) -> DevicesApi {
        DevicesApi::new(Arc::clone(&self.transport))
    }

    /// Settings endpoints (scripts and FortiManagers).
    #[must_use]
    pub fn settings(&self) -> SettingsApi {
        SettingsApi {
            transport: Arc::clone(&self.transport),
        }
    }

    /// System status endpoints.
    #[must_use]
    pub fn system(&self) -> SystemApi {
        SystemApi::new(Arc::clone(&self.transport))
    }

    /// Snapshot of the retry/request counters since construction.
    #[must_use]
    pub fn get_retry_stats(&self) -> RetryStatsSnapshot {
        self.transport.retry_stats()
    }

    /// Returns true once [`FortiZtp::logout`] has run.
    #[must_use]
    pub fn is_logged_out(&self) -> bool {
        self.transport.is_closed()
    }

    /// Invalidate the cached token and refuse further calls.
    ///
    /// Idempotent; returns true only for the call that performed the
    /// teardown. Existing namespace handles become unusable.
    pub fn logout(&self) -> bool {
        self.transport.logout()
    }

    /// Run `op` with this client, then log out exactly once.
    ///
    /// Logout happens whether `op` succeeds or fails; the closure's result
    /// is returned unchanged. Logout is not performed if `op` panics.
    pub async fn scoped<T, F, Fut>(self, op: F) -> Result<T>
    where
        F: FnOnce(FortiZtp) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let guard = self.clone();
        let result = op(self).await;
        guard.logout();
        result
    }
}

/// Grouping handle for the `/v2/setting` endpoints.
#[derive(Clone)]
pub struct SettingsApi {
    transport: Arc<HttpTransport>,
}

impl SettingsApi {
    /// Pre-run CLI script endpoints.
    #[must_use]
    pub fn scripts(&self) -> ScriptsApi {
        ScriptsApi::new(Arc::clone(&self.transport))
    }

    /// FortiManager setting endpoints.
    #[must_use]
    pub fn fortimanagers(&self) -> FortiManagersApi {
        FortiManagersApi::new(Arc::clone(&self.transport))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use fortiztp_core::audit::{AuditOutcome, AuditRecord, AuditSink};
    use wiremock::matchers::{bearer_token, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_client(server: &MockServer) -> FortiZtp {
        FortiZtp::builder()
            .base_url(server.uri())
            .oauth_token("test-token")
            .max_retries(0)
            .build()
            .unwrap()
    }

    #[test]
    fn build_without_auth_is_a_config_error() {
        let err = FortiZtp::builder().build().unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn build_rejects_invalid_base_url() {
        let err = FortiZtp::builder()
            .oauth_token("t")
            .base_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn namespaces_are_available_after_construction() {
        let client = FortiZtp::builder().oauth_token("t").build().unwrap();
        let _devices = client.devices();
        let settings = client.settings();
        let _scripts = settings.scripts();
        let _fortimanagers = settings.fortimanagers();
        let _system = client.system();
        assert!(!client.is_logged_out());
    }

    #[tokio::test]
    async fn bearer_token_reaches_the_wire() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/system"))
            .and(bearer_token("test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "serviceName": "FortiZTP",
                "serviceStatus": "Operational"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let status = client.system().status().await.unwrap();
        assert_eq!(status.service_name, "FortiZTP");
    }

    #[tokio::test]
    async fn logout_is_idempotent_and_blocks_further_calls() {
        let server = MockServer::start().await;
        let client = test_client(&server);

        assert!(client.logout());
        assert!(!client.logout());
        assert!(client.is_logged_out());

        let err = client.system().status().await.unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));
    }

    #[tokio::test]
    async fn read_only_blocks_every_mutating_call_without_network() {
        let server = MockServer::start().await;
        let client = FortiZtp::builder()
            .base_url(server.uri())
            .oauth_token("test-token")
            .read_only(true)
            .build()
            .unwrap();

        let request = crate::models::ProvisionRequest::new(
            "FGT60F0000000001",
            crate::models::DeviceType::FortiGate,
        );
        let err = client.devices().provision(&request).await.unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));

        let script = crate::models::ScriptWrite {
            oid: 10,
            name: "bootstrap".to_string(),
            update_time: None,
        };
        let err = client.settings().scripts().update(&script).await.unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));

        let err = client
            .settings()
            .fortimanagers()
            .delete(5)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));

        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn retry_stats_count_transient_failures_then_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/system"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/system"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "serviceName": "FortiZTP",
                "serviceStatus": "Operational"
            })))
            .mount(&server)
            .await;

        let client = FortiZtp::builder()
            .base_url(server.uri())
            .oauth_token("test-token")
            .max_retries(3)
            .build()
            .unwrap();

        client.system().status().await.unwrap();

        let stats = client.get_retry_stats();
        assert_eq!(stats.total_requests, 1);
        assert_eq!(stats.successful_requests, 1);
        assert_eq!(stats.failed_requests, 0);
        assert_eq!(stats.total_retries, 2);
    }

    struct CountingSink {
        logouts: AtomicUsize,
    }

    impl AuditSink for CountingSink {
        fn record(&self, record: &AuditRecord) {
            if record.outcome == AuditOutcome::Local {
                self.logouts.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[tokio::test]
    async fn scoped_logs_out_exactly_once_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/system"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "serviceName": "FortiZTP",
                "serviceStatus": "Operational"
            })))
            .mount(&server)
            .await;

        let sink = Arc::new(CountingSink {
            logouts: AtomicUsize::new(0),
        });
        let client = FortiZtp::builder()
            .base_url(server.uri())
            .oauth_token("test-token")
            .audit_sink(sink.clone())
            .build()
            .unwrap();

        let name = client
            .scoped(|client| async move {
                let status = client.system().status().await?;
                Ok(status.service_name.clone())
            })
            .await
            .unwrap();

        assert_eq!(name, "FortiZTP");
        assert_eq!(sink.logouts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn scoped_logs_out_exactly_once_on_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/system"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let sink = Arc::new(CountingSink {
            logouts: AtomicUsize::new(0),
        });
        let client = FortiZtp::builder()
            .base_url(server.uri())
            .oauth_token("test-token")
            .max_retries(0)
            .audit_sink(sink.clone())
            .build()
            .unwrap();

        let result = client
            .scoped(|client| async move {
                client.system().status().await.map(|_| ())
            })
            .await;

        assert!(matches!(result, Err(Error::NotFound(_))));
        assert_eq!(sink.logouts.load(Ordering::SeqCst), 1);
    }
}
