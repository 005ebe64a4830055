//! FortiManager setting endpoints (`/v2/setting/fortimanagers`).

use std::sync::Arc;

use fortiztp_core::client::{HttpTransport, RequestBody};
use fortiztp_core::{Error, Result};
use reqwest::Method;

use crate::client::fetch_json;
use crate::models::{FortiManagerMeta, FortiManagerWrite, Page};
use crate::response::ApiResponse;

/// Endpoints for managing FortiManager settings.
#[derive(Clone)]
pub struct FortiManagersApi {
    transport: Arc<HttpTransport>,
}

impl FortiManagersApi {
    pub(crate) fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    fn require_identity(write: &FortiManagerWrite) -> Result<()> {
        if write.sn.trim().is_empty() {
            return Err(Error::ValidationError(
                "FortiManager serial number must not be empty".to_string(),
            ));
        }
        if write.ip.trim().is_empty() {
            return Err(Error::ValidationError(
                "FortiManager address must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// List FortiManager records.
    pub async fn list(&self) -> Result<ApiResponse<Page<FortiManagerMeta>>> {
        fetch_json(
            &self.transport,
            "fortimanagers.list",
            Method::GET,
            "/v2/setting/fortimanagers",
            &[],
            None,
        )
        .await
    }

    /// Fetch one FortiManager record.
    pub async fn get(&self, oid: u64) -> Result<ApiResponse<FortiManagerMeta>> {
        fetch_json(
            &self.transport,
            "fortimanagers.get",
            Method::GET,
            &format!("/v2/setting/fortimanagers/{oid}"),
            &[],
            None,
        )
        .await
    }

    /// Register a FortiManager. The server assigns the oid.
    pub async fn create(
        &self,
        write: &FortiManagerWrite,
    ) -> Result<ApiResponse<serde_json::Value>> {
        Self::require_identity(write)?;
        fetch_json(
            &self.transport,
            "fortimanagers.create",
            Method::POST,
            "/v2/setting/fortimanagers",
            &[],
            Some(RequestBody::Json(serde_json::to_value(write)?)),
        )
        .await
    }

    /// Update the FortiManager record addressed by `oid`.
    pub async fn update(
        &self,
        oid: u64,
        write: &FortiManagerWrite,
    ) -> Result<ApiResponse<serde_json::Value>> {
        Self::require_identity(write)?;
        fetch_json(
            &self.transport,
            "fortimanagers.update",
            Method::PUT,
            &format!("/v2/setting/fortimanagers/{oid}"),
            &[],
            Some(RequestBody::Json(serde_json::to_value(write)?)),
        )
        .await
    }

    /// Delete a FortiManager record.
    pub async fn delete(&self, oid: u64) -> Result<ApiResponse<serde_json::Value>> {
        fetch_json(
            &self.transport,
            "fortimanagers.delete",
            Method::DELETE,
            &format!("/v2/setting/fortimanagers/{oid}"),
            &[],
            None,
        )
        .await
    }
}
