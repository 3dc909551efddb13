#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Bridge dispatch tests: module name, constants export and method invocation

mod common;

use common::{FakeEnvironment, FakeFacility, usb_pairing};
use device_info::bridge::{GET_CONSTANTS, GET_DEVICES};
use device_info::{
    AppIdentity, DeviceConstants, DeviceInfoError, DeviceInfoModule, DeviceInfoProvider,
    MODULE_NAME, NativeModule, UsbDeviceRecord,
};
use serde_json::{Value, json};
use std::sync::Arc;

fn module(facility: FakeFacility) -> DeviceInfoModule {
    DeviceInfoModule::new(
        DeviceInfoProvider::new(facility, FakeEnvironment::default())
            .with_app_identity(AppIdentity::new("contoso.app", "1.0.7")),
    )
}

#[test]
fn test_module_registers_under_fixed_name() {
    let m = module(FakeFacility::default());
    assert_eq!(m.name(), "RNDeviceInfo");
    assert_eq!(MODULE_NAME, "RNDeviceInfo");
    assert_eq!(m.methods(), &[GET_CONSTANTS, GET_DEVICES]);
}

#[test]
fn test_constants_export_matches_get_constants_call() {
    let m = module(FakeFacility::hyperv_guest());
    let exported = m.constants();
    let invoked = m.invoke("getConstants", &[]).unwrap();

    assert_eq!(Value::Object(exported.clone()), invoked);
    assert_eq!(exported.len(), DeviceConstants::KEYS.len());
    assert_eq!(exported["appVersion"], json!("1.0.7.0"));
    assert_eq!(exported["buildNumber"], json!(7));
    assert_eq!(exported["userAgent"], json!("not available"));
    assert_eq!(exported["isEmulator"], json!(true));
}

#[test]
fn test_constants_export_never_fails_on_broken_facility() {
    let m = module(FakeFacility {
        fail_system: true,
        fail_product: true,
        fail_os: true,
        fail_usb: true,
        ..FakeFacility::default()
    });
    let exported = m.constants();
    assert_eq!(exported["model"], json!("not available"));
    assert_eq!(exported["isEmulator"], json!(false));
}

#[test]
fn test_get_devices_serializes_records() {
    let m = module(FakeFacility::default().with_pairings(vec![usb_pairing(
        r"USB\VID_05AC&PID_12A8\00008030",
        r"USB\VID_05AC&PID_12A8\00008030",
        "Apple Mobile Device USB Composite Device",
        "Apple Mobile Device USB Composite Device",
    )]));

    let value = m.invoke("getDevices", &[]).unwrap();
    assert_eq!(
        value,
        json!([{
            "DeviceId": r"USB\VID_05AC&PID_12A8\00008030",
            "PnpDeviceId": r"USB\VID_05AC&PID_12A8\00008030",
            "Description": "Apple Mobile Device USB Composite Device",
            "Name": "Apple Mobile Device USB Composite Device",
        }])
    );

    let records: Vec<UsbDeviceRecord> = serde_json::from_value(value).unwrap();
    assert_eq!(records.len(), 1);
}

#[test]
fn test_get_devices_empty_is_empty_array() {
    let m = module(FakeFacility::default());
    assert_eq!(m.invoke("getDevices", &[]).unwrap(), json!([]));
}

#[test]
fn test_get_devices_error_reaches_caller() {
    let m = module(FakeFacility {
        fail_usb: true,
        ..FakeFacility::default()
    });
    let err = m.invoke("getDevices", &[]).unwrap_err();
    assert!(matches!(err, DeviceInfoError::ManagementQuery { .. }));
}

#[test]
fn test_unknown_method_is_rejected() {
    let m = module(FakeFacility::default());
    let err = m.invoke("getBatteryLevel", &[]).unwrap_err();
    assert!(matches!(err, DeviceInfoError::UnknownMethod(ref name) if name == "getBatteryLevel"));
}

#[test]
fn test_arguments_are_rejected() {
    let m = module(FakeFacility::default());
    let err = m.invoke("getDevices", &[json!(1)]).unwrap_err();
    assert!(matches!(err, DeviceInfoError::InvalidArguments { .. }));
}

#[test]
fn test_module_is_shareable_across_threads() {
    let m = Arc::new(module(FakeFacility::hyperv_guest()));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let m = Arc::clone(&m);
            std::thread::spawn(move || m.invoke("getConstants", &[]).unwrap())
        })
        .collect();

    let results: Vec<Value> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}
