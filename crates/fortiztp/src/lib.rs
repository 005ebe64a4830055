//! Client SDK for the FortiZTP Cloud REST API.
//!
//! FortiZTP is Fortinet's zero-touch provisioning service: factory-fresh
//! devices contact the cloud and are redirected to their management target
//! (FortiManager, FortiGate Cloud, FortiEdge Cloud, or an external
//! controller). This crate wraps the `/v2` API with typed models and a
//! namespace-per-endpoint-group client.
//!
//! # Example
//!
//! ```no_run
//! use fortiztp::{Credentials, DeviceListParams, FortiZtp};
//!
//! # async fn run() -> fortiztp::Result<()> {
//! let client = FortiZtp::builder()
//!     .credentials(Credentials::new("api-user", "api-password"))
//!     .build()?;
//!
//! let page = client.devices().list(&DeviceListParams::default()).await?;
//! for device in &page.data {
//!     println!("{} is {}", device.device_sn, device.provision_status);
//! }
//!
//! client.logout();
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod devices;
pub mod fortimanagers;
pub mod models;
pub mod response;
pub mod scripts;
pub mod system;

pub use client::{FortiZtp, FortiZtpBuilder, SettingsApi};
pub use devices::DevicesApi;
pub use fortimanagers::FortiManagersApi;
pub use models::{
    BulkResultItem, Device, DeviceListParams, DeviceRef, DeviceType, FirmwareProfile,
    FortiManagerMeta, FortiManagerWrite, Page, ProvisionRequest, ProvisionStatus,
    ProvisionSubStatus, ProvisionTarget, ScriptMeta, ScriptWrite, ServiceStatus, SystemStatus,
};
pub use response::ApiResponse;
pub use scripts::ScriptsApi;
pub use system::SystemApi;

pub use fortiztp_core::auth::Credentials;
pub use fortiztp_core::client::RetryStatsSnapshot;
pub use fortiztp_core::config::ConnectionConfig;
pub use fortiztp_core::{Error, Result};
