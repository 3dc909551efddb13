/// Errors for device information queries
#[derive(Debug, thiserror::Error)]
pub enum DeviceInfoError {
    #[error("Management query against {facility} failed: {message}")]
    ManagementQuery {
        facility: &'static str,
        message: String,
    },

    #[error("Not supported on this platform: {0}")]
    Unsupported(String),

    #[error("Unknown bridge method: {0}")]
    UnknownMethod(String),

    #[error("Invalid arguments for {method}: {message}")]
    InvalidArguments { method: String, message: String },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DeviceInfoError {
    /// Wrap a backend failure for the named management facility.
    #[must_use]
    pub fn query(facility: &'static str, err: impl std::fmt::Display) -> Self {
        Self::ManagementQuery {
            facility,
            message: err.to_string(),
        }
    }
}
