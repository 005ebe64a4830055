//! System status endpoint (`/v2/system`).

use std::sync::Arc;

use fortiztp_core::client::HttpTransport;
use fortiztp_core::Result;
use reqwest::Method;

use crate::client::fetch_json;
use crate::models::SystemStatus;
use crate::response::ApiResponse;

/// Endpoint for the service status snapshot.
#[derive(Clone)]
pub struct SystemApi {
    transport: Arc<HttpTransport>,
}

impl SystemApi {
    pub(crate) fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// Fetch the current FortiZTP service status.
    pub async fn status(&self) -> Result<ApiResponse<SystemStatus>> {
        fetch_json(
            &self.transport,
            "system.status",
            Method::GET,
            "/v2/system",
            &[],
            None,
        )
        .await
    }
}
