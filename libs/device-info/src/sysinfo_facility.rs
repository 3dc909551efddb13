use crate::error::DeviceInfoError;
use crate::management::{
    COMPUTER_SYSTEM, COMPUTER_SYSTEM_PRODUCT, ManagementFacility, OPERATING_SYSTEM,
    USB_CONTROLLER_DEVICE,
};
use crate::model::{
    ComputerSystem, ComputerSystemProduct, OperatingSystem, PnpEntity, UsbControllerDevice,
};
use rusb::UsbContext;
use std::path::PathBuf;
use sysinfo::System;

/// Default location of the DMI tables exported by the Linux kernel
const DMI_ID_DIR: &str = "/sys/class/dmi/id";

/// Management facility for non-Windows hosts.
///
/// OS attributes come from `sysinfo`, machine attributes from the DMI tables
/// (Linux only), USB pairings from libusb.
#[derive(Debug, Clone)]
pub struct SysinfoFacility {
    dmi_dir: PathBuf,
}

impl SysinfoFacility {
    #[must_use]
    pub fn new() -> Self {
        Self {
            dmi_dir: PathBuf::from(DMI_ID_DIR),
        }
    }

    /// Read DMI attributes from another directory (fixtures, containers).
    #[must_use]
    pub fn with_dmi_dir(dmi_dir: impl Into<PathBuf>) -> Self {
        Self {
            dmi_dir: dmi_dir.into(),
        }
    }

    fn ensure_dmi(&self, facility: &'static str) -> Result<(), DeviceInfoError> {
        check_dmi_platform(std::env::consts::OS)?;
        if self.dmi_dir.is_dir() {
            Ok(())
        } else {
            Err(DeviceInfoError::query(
                facility,
                format!("DMI tables not found at {}", self.dmi_dir.display()),
            ))
        }
    }

    /// Read one DMI attribute. Missing, unreadable (root-only) and blank
    /// attributes all read as null.
    fn dmi_attr(&self, name: &str) -> Option<String> {
        let raw = std::fs::read_to_string(self.dmi_dir.join(name)).ok()?;
        let value = raw.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_owned())
        }
    }
}

impl Default for SysinfoFacility {
    fn default() -> Self {
        Self::new()
    }
}

impl ManagementFacility for SysinfoFacility {
    fn computer_system(&self) -> Result<Vec<ComputerSystem>, DeviceInfoError> {
        self.ensure_dmi(COMPUTER_SYSTEM)?;
        Ok(vec![ComputerSystem {
            manufacturer: self.dmi_attr("sys_vendor"),
            model: self.dmi_attr("product_name"),
            system_sku_number: self.dmi_attr("product_sku"),
        }])
    }

    fn computer_system_product(&self) -> Result<Vec<ComputerSystemProduct>, DeviceInfoError> {
        self.ensure_dmi(COMPUTER_SYSTEM_PRODUCT)?;
        Ok(vec![ComputerSystemProduct {
            version: self.dmi_attr("product_version"),
            uuid: self.dmi_attr("product_uuid"),
        }])
    }

    fn operating_system(&self) -> Result<Vec<OperatingSystem>, DeviceInfoError> {
        let caption = System::long_os_version().or_else(System::name);
        let version = System::os_version().or_else(System::kernel_version);
        if caption.is_none() && version.is_none() {
            return Err(DeviceInfoError::query(
                OPERATING_SYSTEM,
                "sysinfo reported neither OS name nor version",
            ));
        }
        Ok(vec![OperatingSystem { caption, version }])
    }

    fn usb_controller_devices(&self) -> Result<Vec<UsbControllerDevice>, DeviceInfoError> {
        let context =
            rusb::Context::new().map_err(|e| DeviceInfoError::query(USB_CONTROLLER_DEVICE, e))?;
        let devices = context
            .devices()
            .map_err(|e| DeviceInfoError::query(USB_CONTROLLER_DEVICE, e))?;

        let mut pairings = Vec::with_capacity(devices.len());
        for device in devices.iter() {
            let descriptor = device
                .device_descriptor()
                .map_err(|e| DeviceInfoError::query(USB_CONTROLLER_DEVICE, e))?;
            let bus = device.bus_number();
            let address = device.address();

            // Opening needs permissions the caller may not have; fall back to the class name.
            let product = device
                .open()
                .ok()
                .and_then(|handle| handle.read_product_string_ascii(&descriptor).ok())
                .map(|p| p.trim().to_owned())
                .filter(|p| !p.is_empty());

            let hardware_id = format!(
                "USB\\VID_{:04X}&PID_{:04X}",
                descriptor.vendor_id(),
                descriptor.product_id()
            );
            let description = usb_class_name(descriptor.class_code()).to_owned();

            pairings.push(UsbControllerDevice {
                antecedent: format!("USB bus {bus}"),
                dependent: PnpEntity {
                    device_id: Some(format!("{hardware_id}\\{bus}-{address}")),
                    pnp_device_id: Some(hardware_id),
                    name: Some(product.unwrap_or_else(|| description.clone())),
                    description: Some(description),
                },
            });
        }

        tracing::debug!(count = pairings.len(), "Enumerated USB devices via libusb");
        Ok(pairings)
    }
}

/// Only the Linux kernel exports DMI tables through sysfs.
fn check_dmi_platform(os: &str) -> Result<(), DeviceInfoError> {
    if os == "linux" {
        Ok(())
    } else {
        Err(DeviceInfoError::Unsupported(format!(
            "machine attributes need DMI tables, which {os} does not export"
        )))
    }
}

/// Human-readable name of a USB device class code
fn usb_class_name(class_code: u8) -> &'static str {
    match class_code {
        0x00 => "USB Composite Device",
        0x01 => "USB Audio Device",
        0x02 => "USB Communications Device",
        0x03 => "USB Input Device",
        0x06 => "USB Imaging Device",
        0x07 => "USB Printing Support",
        0x08 => "USB Mass Storage Device",
        0x09 => "USB Root Hub",
        0x0A => "USB CDC Data Device",
        0x0B => "USB Smart Card Reader",
        0x0E => "USB Video Device",
        0xE0 => "USB Wireless Controller",
        0xEF => "USB Miscellaneous Device",
        0xFF => "USB Vendor Specific Device",
        _ => "USB Device",
    }
}
