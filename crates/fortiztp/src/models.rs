//! Wire schemas for the FortiZTP Cloud API v2.
//!
//! Every struct here is a pure data contract: a mapping from wire field name
//! to value, with not-required fields modeled as `Option` (an absent key
//! deserializes to `None`, deterministically). Closed enums tolerate unknown
//! wire strings through an `Other` variant rather than failing, so a newer
//! server never breaks deserialization.

use fortiztp_core::query::QueryParams;
use serde::{Deserialize, Serialize};

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// Value not known to this SDK version, preserved verbatim.
            Other(String),
        }

        impl $name {
            /// Returns the wire representation.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $wire, )+
                    Self::Other(value) => value,
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                match value {
                    $( $wire => Self::$variant, )+
                    other => Self::Other(other.to_string()),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let value = String::deserialize(deserializer)?;
                Ok(Self::from(value.as_str()))
            }
        }
    };
}

wire_enum! {
    /// Supported device types for provisioning.
    DeviceType {
        /// FortiGate firewall.
        FortiGate => "FortiGate",
        /// FortiAP access point.
        FortiAp => "FortiAP",
        /// FortiSwitch.
        FortiSwitch => "FortiSwitch",
        /// FortiExtender.
        FortiExtender => "FortiExtender",
    }
}

wire_enum! {
    /// Device provision status values.
    ProvisionStatus {
        /// Device is provisioned.
        Provisioned => "provisioned",
        /// Device is unprovisioned.
        Unprovisioned => "unprovisioned",
        /// Device is hidden.
        Hidden => "hidden",
        /// Provisioning is incomplete; see the sub-status.
        Incomplete => "incomplete",
    }
}

wire_enum! {
    /// Sub-status for incomplete provisioning.
    ProvisionSubStatus {
        /// Waiting for the device to contact the cloud.
        Waiting => "waiting",
        /// Provisioning in progress.
        Provisioning => "provisioning",
        /// Provisioning has been running longer than expected.
        ProvisioningTooLong => "provisioningtoolong",
    }
}

wire_enum! {
    /// Provisioning target type.
    ProvisionTarget {
        /// On-premise FortiManager.
        FortiManager => "FortiManager",
        /// FortiGate Cloud.
        FortiGateCloud => "FortiGateCloud",
        /// FortiEdge Cloud.
        FortiEdgeCloud => "FortiEdgeCloud",
        /// External (non-Fortinet) controller.
        ExternalController => "ExternalController",
    }
}

wire_enum! {
    /// System service status values.
    ServiceStatus {
        /// Fully operational.
        Operational => "Operational",
        /// Degraded performance.
        DegradedPerformance => "Degraded performance",
        /// Partial outage.
        PartialOutage => "Partial outage",
        /// Major outage.
        MajorOutage => "Major outage",
    }
}

/// Device provisioning snapshot as returned by the API.
///
/// The SDK only reads and forwards these records; device state is owned
/// server-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Device serial number.
    #[serde(rename = "deviceSN")]
    pub device_sn: String,
    /// Device type.
    pub device_type: DeviceType,
    /// Current provision status.
    pub provision_status: ProvisionStatus,
    /// Target system for provisioning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provision_target: Option<ProvisionTarget>,
    /// Device region; required for cloud targets only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// FortiManager serial number, for FortiManager provisioning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_controller_sn: Option<String>,
    /// FQDN/IP of the FortiManager or external controller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_controller_ip: Option<String>,
    /// VM platform, e.g. `FortiGate-VM64-KVM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Firmware profile name from FortiGate Cloud.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware_profile: Option<String>,
    /// Associated FortiManager oid; preferred over sn/ip linkage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forti_manager_oid: Option<u64>,
    /// Pre-run script oid for FortiManager provisioning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_oid: Option<u64>,
    /// Use the FortiManager's default pre-run script.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_default_script: Option<bool>,
    /// Unix timestamp when provisioning started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_timestamp: Option<i64>,
    /// Unix timestamp when provisioning completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_complete_timestamp: Option<i64>,
    /// Sub-status while provisioning is incomplete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provision_sub_status: Option<ProvisionSubStatus>,
    /// Description of the sub-status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Server-paginated result envelope.
///
/// `data` preserves server order; the server guarantees
/// `data.len() <= total`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    /// Total number of matching records.
    pub total: u64,
    /// One page of records, in server order.
    pub data: Vec<T>,
    /// Whether cached data was served.
    #[serde(default, rename = "hasCache", skip_serializing_if = "Option::is_none")]
    pub has_cache: Option<bool>,
}

/// Script metadata; content is transferred separately as opaque text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScriptMeta {
    /// Unique script identifier.
    pub oid: u64,
    /// Script name.
    pub name: String,
    /// Update time in milliseconds since the Unix epoch (UTC).
    #[serde(default, rename = "updateTime", skip_serializing_if = "Option::is_none")]
    pub update_time: Option<i64>,
}

/// FortiManager setting record.
///
/// HA pairs are expressed as comma-separated `sn`/`ip` values, not separate
/// records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FortiManagerMeta {
    /// Unique identifier.
    pub oid: u64,
    /// Serial number(s), comma-separated for HA.
    pub sn: String,
    /// IP/hostname(s), comma-separated for HA.
    pub ip: String,
    /// Pre-run CLI script oid.
    #[serde(default, rename = "scriptOid", skip_serializing_if = "Option::is_none")]
    pub script_oid: Option<u64>,
    /// Update time in milliseconds since the Unix epoch (UTC).
    #[serde(default, rename = "updateTime", skip_serializing_if = "Option::is_none")]
    pub update_time: Option<i64>,
}

/// FortiZTP service status snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    /// Service name, e.g. `FortiZTP`.
    pub service_name: String,
    /// Service region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_region: Option<String>,
    /// Service status.
    pub service_status: ServiceStatus,
    /// Server timestamp (ISO format).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_time: Option<String>,
}

/// Firmware profile available to a device in a region.
///
/// Only `name` is documented; the remaining fields are tolerated when the
/// server sends them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FirmwareProfile {
    /// Profile name.
    pub name: String,
    /// Firmware version the profile pins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,
    /// Platform the profile applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

/// Per-item outcome of a bulk provision/unprovision call.
///
/// Items come back in request order, so a failure can be correlated to the
/// original request by position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BulkResultItem {
    /// Serial number the item applies to.
    #[serde(default, rename = "deviceSN", skip_serializing_if = "Option::is_none")]
    pub device_sn: Option<String>,
    /// Item status reported by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Failure detail, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BulkResultItem {
    /// Returns true when the server marked this item successful.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case("success"))
    }
}

/// Identifying key for a device in unprovision calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRef {
    /// Device serial number.
    #[serde(rename = "deviceSN")]
    pub device_sn: String,
    /// Device type.
    pub device_type: DeviceType,
}

impl DeviceRef {
    /// Create a device reference.
    pub fn new(device_sn: impl Into<String>, device_type: DeviceType) -> Self {
        Self {
            device_sn: device_sn.into(),
            device_type,
        }
    }
}

/// Provisioning request for a single device.
///
/// The provision status itself is set by the endpoint method
/// (`provision` vs `unprovision`), not by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionRequest {
    /// Device serial number.
    #[serde(rename = "deviceSN")]
    pub device_sn: String,
    /// Device type.
    pub device_type: DeviceType,
    /// Target system for provisioning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provision_target: Option<ProvisionTarget>,
    /// Region for cloud targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// FortiManager serial number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_controller_sn: Option<String>,
    /// FortiManager or external controller FQDN/IP.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_controller_ip: Option<String>,
    /// VM platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Firmware profile name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware_profile: Option<String>,
    /// FortiManager oid; preferred over sn/ip linkage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forti_manager_oid: Option<u64>,
    /// Pre-run script oid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_oid: Option<u64>,
    /// Use the FortiManager's default pre-run script.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_default_script: Option<bool>,
    /// Unix timestamp when provisioning started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_timestamp: Option<i64>,
    /// Unix timestamp when provisioning completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_complete_timestamp: Option<i64>,
}

impl ProvisionRequest {
    /// Create a request with only the required identifying fields.
    pub fn new(device_sn: impl Into<String>, device_type: DeviceType) -> Self {
        Self {
            device_sn: device_sn.into(),
            device_type,
            provision_target: None,
            region: None,
            external_controller_sn: None,
            external_controller_ip: None,
            platform: None,
            firmware_profile: None,
            forti_manager_oid: None,
            script_oid: None,
            use_default_script: None,
            provisioning_timestamp: None,
            provisioning_complete_timestamp: None,
        }
    }

    /// Set the provisioning target.
    #[must_use]
    pub fn with_target(mut self, target: ProvisionTarget) -> Self {
        self.provision_target = Some(target);
        self
    }

    /// Set the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the FortiManager oid.
    #[must_use]
    pub const fn with_forti_manager_oid(mut self, oid: u64) -> Self {
        self.forti_manager_oid = Some(oid);
        self
    }

    /// Set the pre-run script oid.
    #[must_use]
    pub const fn with_script_oid(mut self, oid: u64) -> Self {
        self.script_oid = Some(oid);
        self
    }
}

/// Write payload for script metadata (create and update).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScriptWrite {
    /// Script identifier.
    pub oid: u64,
    /// Script name.
    pub name: String,
    /// Update time in milliseconds since the Unix epoch (UTC).
    #[serde(default, rename = "updateTime", skip_serializing_if = "Option::is_none")]
    pub update_time: Option<i64>,
}

/// Write payload for FortiManager settings (create and update).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FortiManagerWrite {
    /// Identifier; assigned by the server on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oid: Option<u64>,
    /// Serial number(s), comma-separated for HA.
    pub sn: String,
    /// IP/hostname(s), comma-separated for HA.
    pub ip: String,
    /// Pre-run CLI script oid.
    #[serde(default, rename = "scriptOid", skip_serializing_if = "Option::is_none")]
    pub script_oid: Option<u64>,
    /// Update time in milliseconds since the Unix epoch (UTC).
    #[serde(default, rename = "updateTime", skip_serializing_if = "Option::is_none")]
    pub update_time: Option<i64>,
}

/// Query parameters for listing devices.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DeviceListParams {
    /// Filter by provision status.
    pub provision_status: Option<ProvisionStatus>,
    /// Filter by device type.
    pub device_type: Option<DeviceType>,
    /// Filter by serial number(s), comma-separated for multiple.
    pub device_sn: Option<String>,
    /// Ask the server for cached data.
    pub use_cache: Option<bool>,
}

impl DeviceListParams {
    /// Convert to URL query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        params.push_opt("provisionStatus", self.provision_status.as_ref());
        params.push_opt("deviceType", self.device_type.as_ref());
        params.push_opt("deviceSN", self.device_sn.as_deref());
        params.push_opt("useCache", self.use_cache);
        params.into_pairs()
    }
}
