use serde::{Deserialize, Serialize};

/// Placeholder for any value that could not be resolved
pub const NOT_AVAILABLE: &str = "not available";

/// Snapshot of device identification, produced once per `getConstants` call.
///
/// Serializes to the flat key set hosts depend on (`appVersion`, `uniqueId`, ...).
/// Field order follows the order in which hosts have always received the keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceConstants {
    pub app_version: String,
    pub build_version: String,
    pub build_number: u32,
    pub instance_id: String,
    pub device_name: String,
    pub system_name: String,
    pub system_version: String,
    pub model: String,
    pub brand: String,
    pub device_id: String,
    pub device_locale: String,
    pub device_country: String,
    pub unique_id: String,
    pub system_manufacturer: String,
    pub bundle_id: String,
    pub user_agent: String,
    pub timezone: String,
    pub is_emulator: bool,
    pub is_tablet: bool,
}

impl DeviceConstants {
    /// Keys of the serialized snapshot, in emission order.
    pub const KEYS: [&'static str; 19] = [
        "appVersion",
        "buildVersion",
        "buildNumber",
        "instanceId",
        "deviceName",
        "systemName",
        "systemVersion",
        "model",
        "brand",
        "deviceId",
        "deviceLocale",
        "deviceCountry",
        "uniqueId",
        "systemManufacturer",
        "bundleId",
        "userAgent",
        "timezone",
        "isEmulator",
        "isTablet",
    ];

    /// Render the snapshot as the key/value mapping handed across the bridge.
    ///
    /// # Errors
    /// Returns `DeviceInfoError::Serialization` if the snapshot cannot be encoded.
    pub fn to_map(
        &self,
    ) -> Result<serde_json::Map<String, serde_json::Value>, crate::DeviceInfoError> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(crate::DeviceInfoError::Internal(format!(
                "constants serialized to a non-object value: {other}"
            ))),
        }
    }
}

impl Default for DeviceConstants {
    fn default() -> Self {
        let na = || NOT_AVAILABLE.to_owned();
        Self {
            app_version: na(),
            build_version: na(),
            build_number: 0,
            instance_id: na(),
            device_name: na(),
            system_name: na(),
            system_version: na(),
            model: na(),
            brand: na(),
            device_id: na(),
            device_locale: na(),
            device_country: na(),
            unique_id: na(),
            system_manufacturer: na(),
            bundle_id: na(),
            user_agent: na(),
            timezone: na(),
            is_emulator: false,
            is_tablet: false,
        }
    }
}

/// One attached USB device, as reported by a controller/device pairing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UsbDeviceRecord {
    pub device_id: String,
    pub pnp_device_id: String,
    pub description: String,
    pub name: String,
}

impl From<&PnpEntity> for UsbDeviceRecord {
    fn from(entity: &PnpEntity) -> Self {
        Self {
            device_id: or_sentinel(entity.device_id.as_deref()),
            pnp_device_id: or_sentinel(entity.pnp_device_id.as_deref()),
            description: or_sentinel(entity.description.as_deref()),
            name: or_sentinel(entity.name.as_deref()),
        }
    }
}

/// Computer-system facility instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputerSystem {
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub system_sku_number: Option<String>,
}

/// Computer-system-product facility instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputerSystemProduct {
    pub version: Option<String>,
    pub uuid: Option<String>,
}

/// Operating-system facility instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatingSystem {
    pub caption: Option<String>,
    pub version: Option<String>,
}

/// Device on the dependent side of a USB controller pairing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PnpEntity {
    pub device_id: Option<String>,
    pub pnp_device_id: Option<String>,
    pub description: Option<String>,
    pub name: Option<String>,
}

/// Controller-to-device association
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsbControllerDevice {
    /// Identifies the controller side of the pairing
    pub antecedent: String,
    pub dependent: PnpEntity,
}

/// Active locale of the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleInfo {
    /// Short culture name, e.g. `en-US`
    pub name: String,
    /// English display name, e.g. `English (United States)`
    pub english_name: String,
}

impl Default for LocaleInfo {
    fn default() -> Self {
        Self {
            name: NOT_AVAILABLE.to_owned(),
            english_name: NOT_AVAILABLE.to_owned(),
        }
    }
}

pub(crate) fn or_sentinel(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_owned()
}
