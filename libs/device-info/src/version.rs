use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identity of the application hosting the bridge.
///
/// The snapshot reports this as `bundleId` and derives `appVersion`,
/// `buildVersion` and `buildNumber` from `version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppIdentity {
    pub name: String,
    /// Config layers may hand over `2.0` as a number; it is kept as text.
    #[serde(deserialize_with = "version_text")]
    pub version: String,
}

fn version_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct VersionText;

    impl Visitor<'_> for VersionText {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a version string or number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_owned())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        // `2.0` must stay two components, so keep the fractional part.
        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            if v.fract().abs() < f64::EPSILON {
                Ok(format!("{v:.1}"))
            } else {
                Ok(v.to_string())
            }
        }
    }

    deserializer.deserialize_any(VersionText)
}

impl AppIdentity {
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl Default for AppIdentity {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

/// Four-part application version (`major.minor.build.revision`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
    pub revision: u32,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VersionParseError {
    #[error("empty version string")]
    Empty,
    #[error("version has {0} components, expected 2 to 4")]
    ComponentCount(usize),
    #[error("invalid version component '{0}'")]
    InvalidComponent(String),
}

impl AppVersion {
    /// Parse `major.minor[.build[.revision]]`.
    ///
    /// Missing trailing components are zero. Anything after a `-` or `+`
    /// (pre-release or build metadata) is ignored.
    ///
    /// # Errors
    /// Returns `VersionParseError` when the core version is empty, has fewer
    /// than two or more than four components, or a component is not a `u32`.
    pub fn parse(raw: &str) -> Result<Self, VersionParseError> {
        let core = raw
            .trim()
            .split(['-', '+'])
            .next()
            .unwrap_or_default();
        if core.is_empty() {
            return Err(VersionParseError::Empty);
        }

        let parts = core
            .split('.')
            .map(|p| {
                p.parse::<u32>()
                    .map_err(|_| VersionParseError::InvalidComponent(p.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if !(2..=4).contains(&parts.len()) {
            return Err(VersionParseError::ComponentCount(parts.len()));
        }

        let at = |i: usize| parts.get(i).copied().unwrap_or(0);
        Ok(Self {
            major: at(0),
            minor: at(1),
            build: at(2),
            revision: at(3),
        })
    }
}

impl fmt::Display for AppVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}
