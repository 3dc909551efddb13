//! Bridge surface: the named module a host runtime dispatches into.
//!
//! The host looks the module up by [`MODULE_NAME`], reads its constants once
//! per request and invokes methods by name with a JSON argument array.

use crate::error::DeviceInfoError;
use crate::provider::DeviceInfoProvider;
use parking_lot::Mutex;
use serde_json::{Map, Value};

/// Name the host runtime uses to look this module up
pub const MODULE_NAME: &str = "RNDeviceInfo";

pub const GET_CONSTANTS: &str = "getConstants";
pub const GET_DEVICES: &str = "getDevices";

/// A module callable from the host runtime
pub trait NativeModule: Send + Sync {
    fn name(&self) -> &str;

    /// Constants exported to the host. Must not fail.
    fn constants(&self) -> Map<String, Value>;

    /// Method names accepted by [`NativeModule::invoke`].
    fn methods(&self) -> &[&'static str];

    /// Invoke a method by name.
    ///
    /// # Errors
    /// Returns `DeviceInfoError::UnknownMethod` for names not listed in
    /// [`NativeModule::methods`], or whatever the method itself raises.
    fn invoke(&self, method: &str, args: &[Value]) -> Result<Value, DeviceInfoError>;
}

/// Device information module exposed under [`MODULE_NAME`].
///
/// Calls are serialized: the underlying OS query facility is not assumed to
/// tolerate concurrent use.
pub struct DeviceInfoModule {
    provider: Mutex<DeviceInfoProvider>,
}

impl DeviceInfoModule {
    #[must_use]
    pub fn new(provider: DeviceInfoProvider) -> Self {
        Self {
            provider: Mutex::new(provider),
        }
    }

    fn constants_value(&self) -> Result<Map<String, Value>, DeviceInfoError> {
        let constants = self.provider.lock().get_constants();
        constants.to_map()
    }
}

impl NativeModule for DeviceInfoModule {
    fn name(&self) -> &str {
        MODULE_NAME
    }

    fn constants(&self) -> Map<String, Value> {
        match self.constants_value() {
            Ok(map) => map,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode device constants");
                Map::new()
            }
        }
    }

    fn methods(&self) -> &[&'static str] {
        &[GET_CONSTANTS, GET_DEVICES]
    }

    fn invoke(&self, method: &str, args: &[Value]) -> Result<Value, DeviceInfoError> {
        tracing::debug!(module = MODULE_NAME, method, "Bridge call");
        if !self.methods().contains(&method) {
            return Err(DeviceInfoError::UnknownMethod(method.to_owned()));
        }
        if !args.is_empty() {
            return Err(DeviceInfoError::InvalidArguments {
                method: method.to_owned(),
                message: format!("expected no arguments, got {}", args.len()),
            });
        }

        if method == GET_CONSTANTS {
            Ok(Value::Object(self.constants_value()?))
        } else {
            let devices = self.provider.lock().get_devices()?;
            Ok(serde_json::to_value(devices)?)
        }
    }
}

impl std::fmt::Debug for DeviceInfoModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceInfoModule")
            .field("name", &MODULE_NAME)
            .finish_non_exhaustive()
    }
}
