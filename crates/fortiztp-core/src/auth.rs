//! OAuth 2.0 authentication against the FortiCloud token service.
//!
//! The transport consumes this module as a capability: produce a valid
//! bearer token, refresh it when it nears expiry, and fail with
//! [`Error::AuthenticationFailed`] when credentials are rejected.
//! Credential failures are never retried.

use crate::config::DEFAULT_CLIENT_ID;
use crate::error::{Error, ErrorPayload, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::debug;

/// Renew a cached token this long before its reported expiry.
const EXPIRY_SKEW: Duration = Duration::from_secs(60);

/// Password-grant credential set for the FortiCloud OAuth endpoint.
#[derive(Debug, Clone)]
pub struct Credentials {
    api_id: String,
    password: SecretString,
    client_id: String,
}

impl Credentials {
    /// Create credentials with the default `fortiztp` client id.
    pub fn new(api_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            api_id: api_id.into(),
            password: SecretString::from(password.into()),
            client_id: DEFAULT_CLIENT_ID.to_string(),
        }
    }

    /// Override the OAuth client id.
    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Return the API id.
    #[must_use]
    pub fn api_id(&self) -> &str {
        &self.api_id
    }

    /// Return the OAuth client id.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    bearer: SecretString,
    expires_at: Option<Instant>,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Instant::now() + EXPIRY_SKEW < expires_at,
            None => true,
        }
    }
}

/// Bearer-token source shared by the transport.
///
/// Holds either a pre-obtained token (never refreshed) or password-grant
/// credentials plus a cached token that is renewed on demand.
pub struct TokenState {
    credentials: Option<Credentials>,
    auth_url: String,
    http: reqwest::Client,
    cached: RwLock<Option<CachedToken>>,
}

impl TokenState {
    /// Build a source around a pre-obtained bearer token.
    ///
    /// The token is used as-is for the lifetime of the client; there is no
    /// refresh path because no credentials are held.
    #[must_use]
    pub fn from_token(token: SecretString, http: reqwest::Client) -> Self {
        Self {
            credentials: None,
            auth_url: String::new(),
            http,
            cached: RwLock::new(Some(CachedToken {
                bearer: token,
                expires_at: None,
            })),
        }
    }

    /// Build a source that logs in with password-grant credentials.
    #[must_use]
    pub fn from_credentials(
        credentials: Credentials,
        auth_url: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            credentials: Some(credentials),
            auth_url: auth_url.into(),
            http,
            cached: RwLock::new(None),
        }
    }

    /// Return a valid bearer token, logging in or refreshing as needed.
    pub async fn bearer_token(&self) -> Result<String> {
        if let Some(cached) = self
            .cached
            .read()
            .map_err(|_| Error::AuthenticationFailed("token cache poisoned".to_string()))?
            .as_ref()
        {
            if cached.is_fresh() {
                return Ok(cached.bearer.expose_secret().to_string());
            }
        }

        let token = self.acquire().await?;
        let bearer = token.bearer.expose_secret().to_string();
        if let Ok(mut cached) = self.cached.write() {
            *cached = Some(token);
        }
        Ok(bearer)
    }

    /// Drop any cached token. Subsequent calls must log in again.
    pub fn invalidate(&self) {
        if let Ok(mut cached) = self.cached.write() {
            *cached = None;
        }
    }

    async fn acquire(&self) -> Result<CachedToken> {
        let Some(credentials) = &self.credentials else {
            return Err(Error::AuthenticationFailed(
                "pre-obtained token expired and no credentials are available".to_string(),
            ));
        };

        debug!(auth_url = %self.auth_url, client_id = %credentials.client_id, "Requesting OAuth token");

        let body = serde_json::json!({
            "username": credentials.api_id,
            "password": credentials.password.expose_secret(),
            "client_id": credentials.client_id,
            "grant_type": "password",
        });

        let response = self
            .http
            .post(&self.auth_url)
            .json(&body)
            .send()
            .await
            .map_err(|err| Error::AuthenticationFailed(format!("token request failed: {err}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| Error::AuthenticationFailed(format!("token response unreadable: {err}")))?;

        if !status.is_success() {
            let detail = ErrorPayload::from_body(&text)
                .map_or_else(|| text.clone(), |payload| payload.describe());
            return Err(Error::AuthenticationFailed(format!(
                "credentials rejected ({status}): {detail}"
            )));
        }

        let token: TokenResponse = serde_json::from_str(&text).map_err(|err| {
            Error::AuthenticationFailed(format!("malformed token response: {err}"))
        })?;

        let Some(access_token) = token.access_token else {
            return Err(Error::AuthenticationFailed(
                "token response carried no access_token".to_string(),
            ));
        };

        Ok(CachedToken {
            bearer: SecretString::from(access_token),
            expires_at: token
                .expires_in
                .map(|secs| Instant::now() + Duration::from_secs(secs)),
        })
    }
}
