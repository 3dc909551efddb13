#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Device Information Library
//!
//! Identification and hardware metadata of the host device, shaped for a
//! cross-platform application bridge:
//! - Device constants (app version, model, manufacturer, OS, locale, timezone,
//!   emulator and tablet detection)
//! - Attached USB devices
//!
//! OS access goes through two seams, [`ManagementFacility`] and
//! [`HostEnvironment`], so the provider logic runs unchanged against WMI on
//! Windows, sysinfo/DMI/libusb elsewhere, or a fixture in tests.

mod locale_names;

#[cfg(not(target_os = "windows"))]
mod sysinfo_facility;
#[cfg(target_os = "windows")]
mod wmi_facility;

pub mod bridge;
pub mod environment;
pub mod error;
pub mod management;
pub mod model;
pub mod provider;
pub mod version;

pub use bridge::{DeviceInfoModule, MODULE_NAME, NativeModule};
pub use environment::{HostEnvironment, SystemEnvironment};
pub use error::DeviceInfoError;
pub use management::ManagementFacility;
pub use model::*;
pub use provider::{DeviceInfoProvider, RecoveryPolicy, is_emulator, is_tablet};
#[cfg(not(target_os = "windows"))]
pub use sysinfo_facility::SysinfoFacility;
pub use version::{AppIdentity, AppVersion, VersionParseError};
#[cfg(target_os = "windows")]
pub use wmi_facility::WmiFacility;

/// Management facility native to the build target
#[cfg(target_os = "windows")]
pub type PlatformFacility = WmiFacility;
/// Management facility native to the build target
#[cfg(not(target_os = "windows"))]
pub type PlatformFacility = SysinfoFacility;

/// Provider wired to the platform facility and the live host environment.
#[must_use]
pub fn default_provider() -> DeviceInfoProvider {
    DeviceInfoProvider::new(PlatformFacility::default(), SystemEnvironment)
}
