//! Device provisioning endpoints (`/v2/devices`).

use std::sync::Arc;

use fortiztp_core::client::{HttpTransport, RequestBody};
use fortiztp_core::query::QueryParams;
use fortiztp_core::{Error, Result};
use reqwest::Method;

use crate::client::fetch_json;
use crate::models::{
    BulkResultItem, Device, DeviceListParams, DeviceRef, FirmwareProfile, Page, ProvisionRequest,
    ProvisionStatus,
};
use crate::response::ApiResponse;

/// Endpoints for listing, provisioning and unprovisioning devices.
#[derive(Clone)]
pub struct DevicesApi {
    transport: Arc<HttpTransport>,
}

impl DevicesApi {
    pub(crate) fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    // Serials and regions are interpolated into the URL path, so they are
    // restricted to characters that cannot alter the request route.
    fn require_segment<'a>(value: &'a str, what: &str) -> Result<&'a str> {
        let value = value.trim();
        if value.is_empty() {
            return Err(Error::ValidationError(format!("{what} must not be empty")));
        }
        if !value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(Error::ValidationError(format!(
                "{what} may only contain letters, digits, '-' and '_'"
            )));
        }
        Ok(value)
    }

    fn require_serial(device_sn: &str) -> Result<&str> {
        Self::require_segment(device_sn, "device serial number")
    }

    fn provision_body(request: &ProvisionRequest, status: &ProvisionStatus) -> Result<serde_json::Value> {
        let mut body = serde_json::to_value(request)?;
        body["provisionStatus"] = serde_json::Value::String(status.as_str().to_string());
        Ok(body)
    }

    /// List devices, optionally filtered.
    ///
    /// The result is one server-side page; `total` reports the full match
    /// count.
    pub async fn list(&self, params: &DeviceListParams) -> Result<ApiResponse<Page<Device>>> {
        fetch_json(
            &self.transport,
            "devices.list",
            Method::GET,
            "/v2/devices",
            &params.to_pairs(),
            None,
        )
        .await
    }

    /// Fetch a single device by serial number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the serial is unknown and
    /// [`Error::ValidationError`] when it is empty.
    pub async fn get(
        &self,
        device_sn: &str,
        use_cache: Option<bool>,
    ) -> Result<ApiResponse<Device>> {
        let device_sn = Self::require_serial(device_sn)?;
        let mut params = QueryParams::new();
        params.push_opt("useCache", use_cache);

        fetch_json(
            &self.transport,
            "devices.get",
            Method::GET,
            &format!("/v2/devices/{device_sn}"),
            &params.into_pairs(),
            None,
        )
        .await
    }

    /// Provision one device.
    pub async fn provision(
        &self,
        request: &ProvisionRequest,
    ) -> Result<ApiResponse<serde_json::Value>> {
        let device_sn = Self::require_serial(&request.device_sn)?.to_string();
        let body = Self::provision_body(request, &ProvisionStatus::Provisioned)?;

        fetch_json(
            &self.transport,
            "devices.provision",
            Method::PUT,
            &format!("/v2/devices/{device_sn}"),
            &[],
            Some(RequestBody::Json(body)),
        )
        .await
    }

    /// Unprovision one device.
    pub async fn unprovision(
        &self,
        device: &DeviceRef,
    ) -> Result<ApiResponse<serde_json::Value>> {
        let device_sn = Self::require_serial(&device.device_sn)?.to_string();
        let mut body = serde_json::to_value(device)?;
        body["provisionStatus"] =
            serde_json::Value::String(ProvisionStatus::Unprovisioned.as_str().to_string());

        fetch_json(
            &self.transport,
            "devices.unprovision",
            Method::PUT,
            &format!("/v2/devices/{device_sn}"),
            &[],
            Some(RequestBody::Json(body)),
        )
        .await
    }

    /// Provision several devices in one call.
    ///
    /// Results come back as one item per request, in request order, so a
    /// single failure does not mask the others.
    pub async fn bulk_provision(
        &self,
        requests: &[ProvisionRequest],
    ) -> Result<ApiResponse<Vec<BulkResultItem>>> {
        if requests.is_empty() {
            return Err(Error::ValidationError(
                "bulk provision requires at least one device".to_string(),
            ));
        }

        let items = requests
            .iter()
            .map(|request| {
                Self::require_serial(&request.device_sn)?;
                Self::provision_body(request, &ProvisionStatus::Provisioned)
            })
            .collect::<Result<Vec<_>>>()?;

        fetch_json(
            &self.transport,
            "devices.bulk_provision",
            Method::PUT,
            "/v2/devices",
            &[],
            Some(RequestBody::Json(serde_json::Value::Array(items))),
        )
        .await
    }

    /// Unprovision several devices in one call.
    pub async fn bulk_unprovision(
        &self,
        devices: &[DeviceRef],
    ) -> Result<ApiResponse<Vec<BulkResultItem>>> {
        if devices.is_empty() {
            return Err(Error::ValidationError(
                "bulk unprovision requires at least one device".to_string(),
            ));
        }

        let items = devices
            .iter()
            .map(|device| {
                Self::require_serial(&device.device_sn)?;
                let mut body = serde_json::to_value(device)?;
                body["provisionStatus"] =
                    serde_json::Value::String(ProvisionStatus::Unprovisioned.as_str().to_string());
                Ok(body)
            })
            .collect::<Result<Vec<_>>>()?;

        fetch_json(
            &self.transport,
            "devices.bulk_unprovision",
            Method::PUT,
            "/v2/devices",
            &[],
            Some(RequestBody::Json(serde_json::Value::Array(items))),
        )
        .await
    }

    /// List firmware profiles available to a device in a region.
    pub async fn firmware_profiles(
        &self,
        device_sn: &str,
        region: &str,
    ) -> Result<ApiResponse<Vec<FirmwareProfile>>> {
        let device_sn = Self::require_serial(device_sn)?;
        let region = Self::require_segment(region, "region")?;

        fetch_json(
            &self.transport,
            "devices.firmware_profiles",
            Method::GET,
            &format!("/v2/devices/{device_sn}/regions/{region}/firmwareprofiles"),
            &[],
            None,
        )
        .await
    }
}
