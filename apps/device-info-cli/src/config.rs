use anyhow::{Context, Result};
use device_info::{AppIdentity, RecoveryPolicy};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variables with this prefix override config keys; `__` separates nesting.
pub const ENV_PREFIX: &str = "DEVICE_INFO__";

/// Effective configuration of the `device-info` host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Identity reported as `bundleId` / `appVersion`
    #[serde(default = "default_app_identity")]
    pub app: AppIdentity,

    #[serde(default)]
    pub recovery: RecoveryPolicy,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_app_identity() -> AppIdentity {
    AppIdentity::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: default_app_identity(),
            recovery: RecoveryPolicy::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "warn".to_owned()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl AppConfig {
    /// Layered load: defaults -> YAML (if provided) -> env (`DEVICE_INFO__*`).
    ///
    /// # Errors
    /// Returns an error if the YAML file is missing or unreadable, or any layer holds an
    /// unknown key or a value of the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.is_file() {
                anyhow::bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("failed to load device-info configuration")
    }

    /// `-v` raises the log level above whatever was configured.
    pub fn apply_verbosity(&mut self, verbose: u8) {
        let level = match verbose {
            0 => return,
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        level.clone_into(&mut self.logging.level);
    }

    /// # Errors
    /// Returns an error if YAML serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).context("failed to serialize configuration to YAML")
    }
}
