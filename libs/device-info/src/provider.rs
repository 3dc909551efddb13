use crate::environment::HostEnvironment;
use crate::error::DeviceInfoError;
use crate::management::{
    COMPUTER_SYSTEM, COMPUTER_SYSTEM_PRODUCT, ManagementFacility, OPERATING_SYSTEM,
};
use crate::model::{DeviceConstants, NOT_AVAILABLE, UsbDeviceRecord, or_sentinel};
use crate::version::{AppIdentity, AppVersion};
use regex::Regex;
use serde::{Deserialize, Serialize};

#[allow(clippy::expect_used)] // good regex, it doesn't panic
static EMULATOR_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new("(?i:virtual)").expect("static regex should not panic")
});

/// True when the model string names a virtual machine.
#[must_use]
pub fn is_emulator(model: &str) -> bool {
    EMULATOR_REGEX.is_match(model)
}

/// True when the tablet form-factor metric is set.
#[must_use]
pub fn is_tablet(metric: i32) -> bool {
    metric != 0
}

/// How failures in the three constants facilities are absorbed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryPolicy {
    /// Any failing facility blanks the fields of all three
    #[default]
    Coarse,
    /// A failing facility blanks only its own fields
    PerFacility,
}

/// Facility-sourced fields, resolved together
#[derive(Debug, Clone, PartialEq, Eq)]
struct SystemFields {
    manufacturer: String,
    model: String,
    sku_number: String,
    hardware_version: String,
    product_uuid: String,
    os_caption: String,
    os_version: String,
}

impl Default for SystemFields {
    fn default() -> Self {
        let na = || NOT_AVAILABLE.to_owned();
        Self {
            manufacturer: na(),
            model: na(),
            sku_number: na(),
            hardware_version: na(),
            product_uuid: na(),
            os_caption: na(),
            os_version: na(),
        }
    }
}

type ApplyFn = fn(&DeviceInfoProvider, &mut SystemFields) -> Result<(), DeviceInfoError>;

/// Answers the two bridge queries from a management facility and a host environment
pub struct DeviceInfoProvider {
    facility: Box<dyn ManagementFacility>,
    environment: Box<dyn HostEnvironment>,
    app: AppIdentity,
    recovery: RecoveryPolicy,
}

impl DeviceInfoProvider {
    #[must_use]
    pub fn new(
        facility: impl ManagementFacility + 'static,
        environment: impl HostEnvironment + 'static,
    ) -> Self {
        Self {
            facility: Box::new(facility),
            environment: Box::new(environment),
            app: AppIdentity::default(),
            recovery: RecoveryPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_app_identity(mut self, app: AppIdentity) -> Self {
        self.app = app;
        self
    }

    #[must_use]
    pub fn with_recovery_policy(mut self, recovery: RecoveryPolicy) -> Self {
        self.recovery = recovery;
        self
    }

    /// Build a fresh constants snapshot. Never fails; unresolved fields keep
    /// their sentinel values.
    #[must_use]
    pub fn get_constants(&self) -> DeviceConstants {
        let mut constants = DeviceConstants {
            bundle_id: self.app.name.clone(),
            ..DeviceConstants::default()
        };

        match AppVersion::parse(&self.app.version) {
            Ok(version) => {
                constants.app_version = version.to_string();
                constants.build_version = version.build.to_string();
                constants.build_number = version.build;
            }
            Err(e) => {
                tracing::warn!(
                    version = %self.app.version,
                    error = %e,
                    "Application version unreadable, keeping defaults"
                );
            }
        }

        constants.device_name = or_sentinel(self.environment.machine_name().as_deref());

        let fields = match self.recovery {
            RecoveryPolicy::Coarse => self.query_system_fields_coarse(),
            RecoveryPolicy::PerFacility => self.query_system_fields_per_facility(),
        };

        let locale = self.environment.locale();

        constants.instance_id = fields.product_uuid;
        constants.system_name = fields.os_caption;
        constants.system_version = fields.os_version;
        constants.is_emulator = is_emulator(&fields.model);
        constants.model = fields.model;
        constants.brand.clone_from(&fields.manufacturer);
        constants.system_manufacturer = fields.manufacturer;
        constants.device_id = fields.hardware_version;
        constants.device_locale = locale.name;
        constants.device_country = locale.english_name;
        constants.unique_id = fields.sku_number;
        constants.timezone = or_sentinel(self.environment.timezone_id().as_deref());
        constants.is_tablet = is_tablet(self.environment.tablet_metric());

        constants
    }

    /// Enumerate attached USB devices in OS order.
    ///
    /// # Errors
    /// Returns `DeviceInfoError` if the USB pairing enumeration fails.
    pub fn get_devices(&self) -> Result<Vec<UsbDeviceRecord>, DeviceInfoError> {
        let pairings = self.facility.usb_controller_devices()?;
        tracing::debug!(count = pairings.len(), "Enumerated USB controller pairings");
        Ok(pairings
            .iter()
            .map(|pairing| UsbDeviceRecord::from(&pairing.dependent))
            .collect())
    }

    fn query_system_fields_coarse(&self) -> SystemFields {
        let mut fields = SystemFields::default();
        match self.try_query_all(&mut fields) {
            Ok(()) => fields,
            Err(e) => {
                tracing::warn!(error = %e, "System management query failed, reverting to defaults");
                SystemFields::default()
            }
        }
    }

    fn try_query_all(&self, fields: &mut SystemFields) -> Result<(), DeviceInfoError> {
        self.apply_computer_system(fields)?;
        self.apply_computer_system_product(fields)?;
        self.apply_operating_system(fields)?;
        Ok(())
    }

    fn query_system_fields_per_facility(&self) -> SystemFields {
        let mut fields = SystemFields::default();
        let steps: [(&str, ApplyFn); 3] = [
            (COMPUTER_SYSTEM, Self::apply_computer_system),
            (COMPUTER_SYSTEM_PRODUCT, Self::apply_computer_system_product),
            (OPERATING_SYSTEM, Self::apply_operating_system),
        ];
        for (facility, apply) in steps {
            let mut staged = fields.clone();
            match apply(self, &mut staged) {
                Ok(()) => fields = staged,
                Err(e) => {
                    tracing::warn!(facility, error = %e, "Facility query failed, keeping defaults");
                }
            }
        }
        fields
    }

    // The last reported instance wins; properties reported as null become the sentinel.

    fn apply_computer_system(&self, fields: &mut SystemFields) -> Result<(), DeviceInfoError> {
        for system in self.facility.computer_system()? {
            fields.manufacturer = or_sentinel(system.manufacturer.as_deref());
            fields.model = or_sentinel(system.model.as_deref());
            fields.sku_number = or_sentinel(system.system_sku_number.as_deref());
        }
        Ok(())
    }

    fn apply_computer_system_product(
        &self,
        fields: &mut SystemFields,
    ) -> Result<(), DeviceInfoError> {
        for product in self.facility.computer_system_product()? {
            fields.hardware_version = or_sentinel(product.version.as_deref());
            fields.product_uuid = or_sentinel(product.uuid.as_deref());
        }
        Ok(())
    }

    fn apply_operating_system(&self, fields: &mut SystemFields) -> Result<(), DeviceInfoError> {
        for os in self.facility.operating_system()? {
            fields.os_caption = or_sentinel(os.caption.as_deref());
            fields.os_version = or_sentinel(os.version.as_deref());
        }
        Ok(())
    }
}

impl std::fmt::Debug for DeviceInfoProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceInfoProvider")
            .field("app", &self.app)
            .field("recovery", &self.recovery)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::model::{
        ComputerSystem, ComputerSystemProduct, LocaleInfo, OperatingSystem, UsbControllerDevice,
    };
    use tracing_test::traced_test;

    struct DeniedFacility;

    impl ManagementFacility for DeniedFacility {
        fn computer_system(&self) -> Result<Vec<ComputerSystem>, DeviceInfoError> {
            Ok(vec![ComputerSystem {
                model: Some("VMware Virtual Platform".to_owned()),
                ..ComputerSystem::default()
            }])
        }

        fn computer_system_product(&self) -> Result<Vec<ComputerSystemProduct>, DeviceInfoError> {
            Err(DeviceInfoError::query(COMPUTER_SYSTEM_PRODUCT, "Access denied"))
        }

        fn operating_system(&self) -> Result<Vec<OperatingSystem>, DeviceInfoError> {
            Ok(Vec::new())
        }

        fn usb_controller_devices(&self) -> Result<Vec<UsbControllerDevice>, DeviceInfoError> {
            Ok(Vec::new())
        }
    }

    struct QuietEnvironment;

    impl HostEnvironment for QuietEnvironment {
        fn machine_name(&self) -> Option<String> {
            None
        }

        fn locale(&self) -> LocaleInfo {
            LocaleInfo::default()
        }

        fn timezone_id(&self) -> Option<String> {
            None
        }

        fn tablet_metric(&self) -> i32 {
            0
        }
    }

    #[test]
    #[traced_test]
    fn test_coarse_failure_is_absorbed_and_logged() {
        let provider = DeviceInfoProvider::new(DeniedFacility, QuietEnvironment);
        let constants = provider.get_constants();

        // The model was read before the product query failed, yet it is discarded too
        assert_eq!(constants.model, NOT_AVAILABLE);
        assert!(!constants.is_emulator);
        assert!(logs_contain("System management query failed"));
        assert!(logs_contain("Access denied"));
    }

    #[test]
    #[traced_test]
    fn test_per_facility_failure_names_the_facility() {
        let provider = DeviceInfoProvider::new(DeniedFacility, QuietEnvironment)
            .with_recovery_policy(RecoveryPolicy::PerFacility);
        let constants = provider.get_constants();

        assert_eq!(constants.model, "VMware Virtual Platform");
        assert!(constants.is_emulator);
        assert!(logs_contain(COMPUTER_SYSTEM_PRODUCT));
    }

    #[test]
    fn test_is_emulator_matches_virtual_anywhere() {
        assert!(is_emulator("Virtual Machine"));
        assert!(is_emulator("VIRTUALBOX"));
        assert!(is_emulator("virtual"));
        assert!(is_emulator("VMware Virtual Platform"));
        assert!(!is_emulator("Surface Pro"));
        assert!(!is_emulator(NOT_AVAILABLE));
    }

    #[test]
    fn test_is_tablet_on_nonzero_metric() {
        assert!(is_tablet(1));
        assert!(is_tablet(-1));
        assert!(!is_tablet(0));
    }

    #[test]
    fn test_recovery_policy_serde_names() {
        assert_eq!(
            serde_json::to_string(&RecoveryPolicy::PerFacility).unwrap(),
            "\"per_facility\""
        );
        assert_eq!(
            serde_json::from_str::<RecoveryPolicy>("\"coarse\"").unwrap(),
            RecoveryPolicy::Coarse
        );
    }
}
