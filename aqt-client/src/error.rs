use thiserror::Error;

/// Failure of a backend call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// A newer call superseded this one, or its owner went away. Never shown
    /// to the user.
    #[error("request was superseded")]
    Cancelled,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// Failure to obtain a location fix. The display text is shown as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeoError {
    #[error("Geolocation not supported")]
    Unsupported,
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Timed out getting location")]
    Timeout,
    #[error("{0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_cancelled_is_cancelled() {
        assert!(FetchError::Cancelled.is_cancelled());
        assert!(!FetchError::Status(500).is_cancelled());
    }

    #[test]
    fn geo_messages() {
        assert_eq!(GeoError::PermissionDenied.to_string(), "Location permission denied");
        assert_eq!(GeoError::Timeout.to_string(), "Timed out getting location");
        assert_eq!(
            GeoError::Unavailable("Position unavailable".into()).to_string(),
            "Position unavailable"
        );
    }
}
