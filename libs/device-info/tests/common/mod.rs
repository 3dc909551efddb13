//! Scripted management facility and host environment for provider tests

#![allow(dead_code)]

use device_info::management::{COMPUTER_SYSTEM, COMPUTER_SYSTEM_PRODUCT, OPERATING_SYSTEM};
use device_info::{
    ComputerSystem, ComputerSystemProduct, DeviceInfoError, HostEnvironment, LocaleInfo,
    ManagementFacility, OperatingSystem, PnpEntity, UsbControllerDevice,
};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct FakeFacility {
    pub systems: Vec<ComputerSystem>,
    pub products: Vec<ComputerSystemProduct>,
    pub operating_systems: Vec<OperatingSystem>,
    pub pairings: Vec<UsbControllerDevice>,
    pub fail_system: bool,
    pub fail_product: bool,
    pub fail_os: bool,
    pub fail_usb: bool,
    pub usb_calls: AtomicUsize,
}

impl FakeFacility {
    /// A Hyper-V guest with one instance per facility.
    pub fn hyperv_guest() -> Self {
        Self {
            systems: vec![ComputerSystem {
                manufacturer: Some("Microsoft Corporation".to_owned()),
                model: Some("Virtual Machine".to_owned()),
                system_sku_number: Some("None".to_owned()),
            }],
            products: vec![ComputerSystemProduct {
                version: Some("Hyper-V UEFI Release v4.1".to_owned()),
                uuid: Some("0B2E1C5A-7F3D-4E2B-9A61-1C2D3E4F5A6B".to_owned()),
            }],
            operating_systems: vec![OperatingSystem {
                caption: Some("Microsoft Windows 11 Pro".to_owned()),
                version: Some("10.0.22631".to_owned()),
            }],
            ..Self::default()
        }
    }

    pub fn with_pairings(mut self, pairings: Vec<UsbControllerDevice>) -> Self {
        self.pairings = pairings;
        self
    }
}

fn fail(facility: &'static str) -> DeviceInfoError {
    DeviceInfoError::query(facility, "Access denied")
}

impl ManagementFacility for FakeFacility {
    fn computer_system(&self) -> Result<Vec<ComputerSystem>, DeviceInfoError> {
        if self.fail_system {
            return Err(fail(COMPUTER_SYSTEM));
        }
        Ok(self.systems.clone())
    }

    fn computer_system_product(&self) -> Result<Vec<ComputerSystemProduct>, DeviceInfoError> {
        if self.fail_product {
            return Err(fail(COMPUTER_SYSTEM_PRODUCT));
        }
        Ok(self.products.clone())
    }

    fn operating_system(&self) -> Result<Vec<OperatingSystem>, DeviceInfoError> {
        if self.fail_os {
            return Err(fail(OPERATING_SYSTEM));
        }
        Ok(self.operating_systems.clone())
    }

    fn usb_controller_devices(&self) -> Result<Vec<UsbControllerDevice>, DeviceInfoError> {
        self.usb_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_usb {
            return Err(DeviceInfoError::query(
                device_info::management::USB_CONTROLLER_DEVICE,
                "RPC server unavailable",
            ));
        }
        Ok(self.pairings.clone())
    }
}

#[derive(Debug, Clone)]
pub struct FakeEnvironment {
    pub machine_name: Option<String>,
    pub locale: LocaleInfo,
    pub timezone: Option<String>,
    pub tablet_metric: i32,
}

impl Default for FakeEnvironment {
    fn default() -> Self {
        Self {
            machine_name: Some("BUILD-AGENT-07".to_owned()),
            locale: LocaleInfo {
                name: "en-US".to_owned(),
                english_name: "English (United States)".to_owned(),
            },
            timezone: Some("Pacific Standard Time".to_owned()),
            tablet_metric: 0,
        }
    }
}

impl HostEnvironment for FakeEnvironment {
    fn machine_name(&self) -> Option<String> {
        self.machine_name.clone()
    }

    fn locale(&self) -> LocaleInfo {
        self.locale.clone()
    }

    fn timezone_id(&self) -> Option<String> {
        self.timezone.clone()
    }

    fn tablet_metric(&self) -> i32 {
        self.tablet_metric
    }
}

pub fn usb_pairing(device_id: &str, pnp: &str, description: &str, name: &str) -> UsbControllerDevice {
    UsbControllerDevice {
        antecedent: r#"\\HOST\root\cimv2:Win32_USBController.DeviceID="PCI\\VEN_8086""#.to_owned(),
        dependent: PnpEntity {
            device_id: Some(device_id.to_owned()),
            pnp_device_id: Some(pnp.to_owned()),
            description: Some(description.to_owned()),
            name: Some(name.to_owned()),
        },
    }
}
