//! Integration tests for parsing FortiZTP device data.
//!
//! These tests validate that the fortiztp models can correctly deserialize
//! a realistic device list response.

use std::fs;
use std::path::PathBuf;

use fortiztp::models::{
    Device, DeviceType, Page, ProvisionStatus, ProvisionSubStatus, ProvisionTarget,
};

/// Get the path to the test fixtures directory.
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Load the device page fixture from disk.
fn load_device_page_fixture() -> String {
    let fixture_path = fixtures_dir().join("device_page.json");
    fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read device page fixture at {}: {}",
            fixture_path.display(),
            e
        )
    })
}

#[test]
fn test_deserialize_device_page() {
    let json_data = load_device_page_fixture();

    let page: Page<Device> = serde_json::from_str(&json_data).unwrap_or_else(|e| {
        panic!(
            "Failed to deserialize device page data: {}\nJSON: {}",
            e, json_data
        )
    });

    assert_eq!(page.total, 4, "Expected 4 total devices in test data");
    assert_eq!(page.data.len(), 4);
    assert!(page.data.len() as u64 <= page.total);
    assert_eq!(page.has_cache, Some(true));
}

#[test]
fn test_fortimanager_provisioned_device() {
    let json_data = load_device_page_fixture();
    let page: Page<Device> = serde_json::from_str(&json_data).unwrap();

    let device = page
        .data
        .iter()
        .find(|d| d.provision_status == ProvisionStatus::Provisioned)
        .expect("Should have a provisioned device");

    assert_eq!(device.device_sn, "FGT60FTK20012345");
    assert_eq!(device.device_type, DeviceType::FortiGate);
    assert_eq!(device.provision_target, Some(ProvisionTarget::FortiManager));
    assert_eq!(
        device.external_controller_ip.as_deref(),
        Some("fmg.branch.example.net")
    );
    assert_eq!(device.forti_manager_oid, Some(42));
    assert_eq!(device.script_oid, Some(10));
    assert_eq!(device.use_default_script, Some(false));
    assert_eq!(device.provisioning_timestamp, Some(1_724_580_000));
    assert_eq!(device.provisioning_complete_timestamp, Some(1_724_580_120));
}

#[test]
fn test_incomplete_device_carries_sub_status() {
    let json_data = load_device_page_fixture();
    let page: Page<Device> = serde_json::from_str(&json_data).unwrap();

    let device = page
        .data
        .iter()
        .find(|d| d.provision_status == ProvisionStatus::Incomplete)
        .expect("Should have an incomplete device");

    assert_eq!(device.provision_target, Some(ProvisionTarget::FortiGateCloud));
    assert_eq!(device.region.as_deref(), Some("europe"));
    assert_eq!(
        device.provision_sub_status,
        Some(ProvisionSubStatus::ProvisioningTooLong)
    );
    assert!(device
        .message
        .as_deref()
        .unwrap()
        .contains("has not contacted"));
}

#[test]
fn test_unprovisioned_device_has_no_target_fields() {
    let json_data = load_device_page_fixture();
    let page: Page<Device> = serde_json::from_str(&json_data).unwrap();

    let device = page
        .data
        .iter()
        .find(|d| d.device_type == DeviceType::FortiAp)
        .expect("Should have a FortiAP device");

    assert_eq!(device.provision_status, ProvisionStatus::Unprovisioned);
    assert!(device.provision_target.is_none());
    assert!(device.region.is_none());
    assert!(device.provisioning_timestamp.is_none());
}

#[test]
fn test_unknown_status_is_preserved() {
    let json_data = load_device_page_fixture();
    let page: Page<Device> = serde_json::from_str(&json_data).unwrap();

    let device = page
        .data
        .iter()
        .find(|d| d.device_sn == "FGVMELTM24005678")
        .expect("Should have the VM device");

    assert_eq!(
        device.provision_status,
        ProvisionStatus::Other("quarantined".to_string())
    );
    assert_eq!(device.platform.as_deref(), Some("FortiGate-VM64-KVM"));
    assert_eq!(device.firmware_profile.as_deref(), Some("kvm-lab-7.4"));
}

#[test]
fn test_reserialization_round_trips_wire_names() {
    let json_data = load_device_page_fixture();
    let page: Page<Device> = serde_json::from_str(&json_data).unwrap();

    let value = serde_json::to_value(&page.data[0]).unwrap();
    assert_eq!(value["deviceSN"], "FGT60FTK20012345");
    assert_eq!(value["fortiManagerOid"], 42);
    assert_eq!(value["provisionTarget"], "FortiManager");
    assert!(value.get("region").is_none());
}
