//! Pre-run CLI script endpoints (`/v2/setting/scripts`).
//!
//! Script content is treated as opaque text in both directions; only the
//! metadata records are JSON.

use std::sync::Arc;

use fortiztp_core::client::{HttpTransport, RequestBody};
use fortiztp_core::{Error, Result};
use reqwest::Method;

use crate::client::{fetch_json, fetch_text};
use crate::models::{Page, ScriptMeta, ScriptWrite};
use crate::response::ApiResponse;

/// Endpoints for managing pre-run CLI scripts.
#[derive(Clone)]
pub struct ScriptsApi {
    transport: Arc<HttpTransport>,
}

impl ScriptsApi {
    pub(crate) fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    fn require_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::ValidationError(
                "script name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// List script metadata.
    pub async fn list(&self) -> Result<ApiResponse<Page<ScriptMeta>>> {
        fetch_json(
            &self.transport,
            "scripts.list",
            Method::GET,
            "/v2/setting/scripts",
            &[],
            None,
        )
        .await
    }

    /// Fetch one script's metadata.
    pub async fn get(&self, oid: u64) -> Result<ApiResponse<ScriptMeta>> {
        fetch_json(
            &self.transport,
            "scripts.get",
            Method::GET,
            &format!("/v2/setting/scripts/{oid}"),
            &[],
            None,
        )
        .await
    }

    /// Create a script metadata record.
    pub async fn create(&self, script: &ScriptWrite) -> Result<ApiResponse<serde_json::Value>> {
        Self::require_name(&script.name)?;
        fetch_json(
            &self.transport,
            "scripts.create",
            Method::POST,
            "/v2/setting/scripts",
            &[],
            Some(RequestBody::Json(serde_json::to_value(script)?)),
        )
        .await
    }

    /// Update a script metadata record. The path identifies the script;
    /// `script.oid` should match.
    pub async fn update(&self, script: &ScriptWrite) -> Result<ApiResponse<serde_json::Value>> {
        Self::require_name(&script.name)?;
        fetch_json(
            &self.transport,
            "scripts.update",
            Method::PUT,
            &format!("/v2/setting/scripts/{}", script.oid),
            &[],
            Some(RequestBody::Json(serde_json::to_value(script)?)),
        )
        .await
    }

    /// Delete a script.
    pub async fn delete(&self, oid: u64) -> Result<ApiResponse<serde_json::Value>> {
        fetch_json(
            &self.transport,
            "scripts.delete",
            Method::DELETE,
            &format!("/v2/setting/scripts/{oid}"),
            &[],
            None,
        )
        .await
    }

    /// Download a script's content as plain text.
    pub async fn download_content(&self, oid: u64) -> Result<ApiResponse<String>> {
        fetch_text(
            &self.transport,
            "scripts.download_content",
            Method::GET,
            &format!("/v2/setting/scripts/{oid}/content"),
            None,
        )
        .await
    }

    /// Upload a script's content as plain text, replacing what is stored.
    pub async fn upload_content(
        &self,
        oid: u64,
        content: impl Into<String>,
    ) -> Result<ApiResponse<serde_json::Value>> {
        fetch_json(
            &self.transport,
            "scripts.upload_content",
            Method::PUT,
            &format!("/v2/setting/scripts/{oid}/content"),
            &[],
            Some(RequestBody::Text(content.into())),
        )
        .await
    }
}
