//! OS management facility seam.
//!
//! Each query returns every instance the facility reports, in the order the
//! OS enumerates them. Callers decide how to fold multiple instances.

use crate::error::DeviceInfoError;
use crate::model::{ComputerSystem, ComputerSystemProduct, OperatingSystem, UsbControllerDevice};

pub const COMPUTER_SYSTEM: &str = "computer-system";
pub const COMPUTER_SYSTEM_PRODUCT: &str = "computer-system-product";
pub const OPERATING_SYSTEM: &str = "operating-system";
pub const USB_CONTROLLER_DEVICE: &str = "usb-controller-device";

/// Read-only access to the host's hardware/system management data
pub trait ManagementFacility: Send {
    /// Manufacturer, model and SKU of the machine.
    ///
    /// # Errors
    /// Returns `DeviceInfoError` if the facility cannot be queried.
    fn computer_system(&self) -> Result<Vec<ComputerSystem>, DeviceInfoError>;

    /// Hardware version and UUID of the machine.
    ///
    /// # Errors
    /// Returns `DeviceInfoError` if the facility cannot be queried.
    fn computer_system_product(&self) -> Result<Vec<ComputerSystemProduct>, DeviceInfoError>;

    /// Display name and version of the running OS.
    ///
    /// # Errors
    /// Returns `DeviceInfoError` if the facility cannot be queried.
    fn operating_system(&self) -> Result<Vec<OperatingSystem>, DeviceInfoError>;

    /// Controller/device pairings for every attached USB device.
    ///
    /// # Errors
    /// Returns `DeviceInfoError` if the enumeration fails.
    fn usb_controller_devices(&self) -> Result<Vec<UsbControllerDevice>, DeviceInfoError>;
}

impl<T: ManagementFacility + Sync> ManagementFacility for std::sync::Arc<T> {
    fn computer_system(&self) -> Result<Vec<ComputerSystem>, DeviceInfoError> {
        (**self).computer_system()
    }

    fn computer_system_product(&self) -> Result<Vec<ComputerSystemProduct>, DeviceInfoError> {
        (**self).computer_system_product()
    }

    fn operating_system(&self) -> Result<Vec<OperatingSystem>, DeviceInfoError> {
        (**self).operating_system()
    }

    fn usb_controller_devices(&self) -> Result<Vec<UsbControllerDevice>, DeviceInfoError> {
        (**self).usb_controller_devices()
    }
}
