use crate::error::DeviceInfoError;
use crate::management::{
    COMPUTER_SYSTEM, COMPUTER_SYSTEM_PRODUCT, ManagementFacility, OPERATING_SYSTEM,
    USB_CONTROLLER_DEVICE,
};
use crate::model::{
    ComputerSystem, ComputerSystemProduct, OperatingSystem, PnpEntity, UsbControllerDevice,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use wmi::WMIConnection;

#[derive(Deserialize, Debug)]
#[serde(rename = "Win32_ComputerSystem")]
#[serde(rename_all = "PascalCase")]
struct Win32ComputerSystem {
    manufacturer: Option<String>,
    model: Option<String>,
    #[serde(rename = "SystemSKUNumber")]
    system_sku_number: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename = "Win32_ComputerSystemProduct")]
#[serde(rename_all = "PascalCase")]
struct Win32ComputerSystemProduct {
    version: Option<String>,
    #[serde(rename = "UUID")]
    uuid: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename = "Win32_OperatingSystem")]
#[serde(rename_all = "PascalCase")]
struct Win32OperatingSystem {
    caption: Option<String>,
    version: Option<String>,
}

/// References are returned as WMI object paths
#[derive(Deserialize, Debug)]
#[serde(rename = "Win32_USBControllerDevice")]
#[serde(rename_all = "PascalCase")]
struct Win32UsbControllerDevice {
    antecedent: String,
    dependent: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename = "Win32_PnPEntity")]
#[serde(rename_all = "PascalCase")]
struct Win32PnpEntity {
    #[serde(rename = "DeviceID")]
    device_id: Option<String>,
    #[serde(rename = "PNPDeviceID")]
    pnp_device_id: Option<String>,
    description: Option<String>,
    name: Option<String>,
}

/// Management facility backed by WMI (`root\cimv2`).
///
/// A connection is opened per query: COM handles stay on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct WmiFacility;

impl WmiFacility {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn connect(facility: &'static str) -> Result<WMIConnection, DeviceInfoError> {
        WMIConnection::new().map_err(|e| DeviceInfoError::query(facility, e))
    }

    fn query<T: DeserializeOwned>(facility: &'static str) -> Result<Vec<T>, DeviceInfoError> {
        let con = Self::connect(facility)?;
        let rows: Vec<T> = con
            .query()
            .map_err(|e| DeviceInfoError::query(facility, e))?;
        tracing::debug!(facility, count = rows.len(), "WMI query completed");
        Ok(rows)
    }
}

impl ManagementFacility for WmiFacility {
    fn computer_system(&self) -> Result<Vec<ComputerSystem>, DeviceInfoError> {
        Ok(Self::query::<Win32ComputerSystem>(COMPUTER_SYSTEM)?
            .into_iter()
            .map(|row| ComputerSystem {
                manufacturer: row.manufacturer,
                model: row.model,
                system_sku_number: row.system_sku_number,
            })
            .collect())
    }

    fn computer_system_product(&self) -> Result<Vec<ComputerSystemProduct>, DeviceInfoError> {
        Ok(
            Self::query::<Win32ComputerSystemProduct>(COMPUTER_SYSTEM_PRODUCT)?
                .into_iter()
                .map(|row| ComputerSystemProduct {
                    version: row.version,
                    uuid: row.uuid,
                })
                .collect(),
        )
    }

    fn operating_system(&self) -> Result<Vec<OperatingSystem>, DeviceInfoError> {
        Ok(Self::query::<Win32OperatingSystem>(OPERATING_SYSTEM)?
            .into_iter()
            .map(|row| OperatingSystem {
                caption: row.caption,
                version: row.version,
            })
            .collect())
    }

    fn usb_controller_devices(&self) -> Result<Vec<UsbControllerDevice>, DeviceInfoError> {
        let con = Self::connect(USB_CONTROLLER_DEVICE)?;
        let pairings: Vec<Win32UsbControllerDevice> = con
            .query()
            .map_err(|e| DeviceInfoError::query(USB_CONTROLLER_DEVICE, e))?;

        pairings
            .into_iter()
            .map(|pairing| {
                let dependent: Win32PnpEntity = con
                    .get_by_path(&pairing.dependent)
                    .map_err(|e| DeviceInfoError::query(USB_CONTROLLER_DEVICE, e))?;
                Ok(UsbControllerDevice {
                    antecedent: pairing.antecedent,
                    dependent: PnpEntity {
                        device_id: dependent.device_id,
                        pnp_device_id: dependent.pnp_device_id,
                        description: dependent.description,
                        name: dependent.name,
                    },
                })
            })
            .collect()
    }
}
