use thiserror::Error;

pub const PERMISSION_DENIED_MESSAGE: &str =
    "Location permission is denied. Please enable location access for this app in Settings.";
pub const LOCATION_UNAVAILABLE_MESSAGE: &str =
    "Unable to get your location. Make sure location services are turned on and try again.";

/// Normalized failure surfaced to the orchestrator and, through it, the UI.
///
/// Every variant carries a message that is safe to show to the user.
/// Provider-specific codes never travel past this type; the only upstream
/// detail kept is the `status` token of [`NearbyError::Provider`] for logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NearbyError {
    /// The user has refused location access; they must change it in settings.
    #[error("{0}")]
    PermissionDenied(String),

    /// The device could not produce a fix. Retrying is safe.
    #[error("{0}")]
    LocationUnavailable(String),

    /// Transport failure, timeout included.
    #[error("{0}")]
    Network(String),

    /// Missing or malformed request parameters.
    #[error("{0}")]
    InvalidRequest(String),

    /// The upstream places service answered with a non-OK status.
    #[error("{message}")]
    Provider { status: String, message: String },

    #[error("{0}")]
    Unknown(String),
}

/// Fieldless discriminant of [`NearbyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    PermissionDenied,
    LocationUnavailable,
    Network,
    InvalidRequest,
    Provider,
    Unknown,
}

impl NearbyError {
    #[must_use]
    pub fn permission_denied() -> Self {
        Self::PermissionDenied(PERMISSION_DENIED_MESSAGE.to_string())
    }

    #[must_use]
    pub fn location_unavailable() -> Self {
        Self::LocationUnavailable(LOCATION_UNAVAILABLE_MESSAGE.to_string())
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Self::LocationUnavailable(_) => ErrorKind::LocationUnavailable,
            Self::Network(_) => ErrorKind::Network,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::Provider { .. } => ErrorKind::Provider,
            Self::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// `true` when repeating the same call may succeed without user action.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self.kind(), ErrorKind::LocationUnavailable | ErrorKind::Network)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
