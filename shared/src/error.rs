use thiserror::Error;

/// Coarse classification of a [`MapError`], stable across message changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    UnknownDistrict,
    MissingIdentifier,
    InvalidDimension,
    RootNotFound,
    NotReady,
    LoadTimeout,
    Dom,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::UnknownDistrict => "unknown_district",
            Self::MissingIdentifier => "missing_identifier",
            Self::InvalidDimension => "invalid_dimension",
            Self::RootNotFound => "root_not_found",
            Self::NotReady => "not_ready",
            Self::LoadTimeout => "load_timeout",
            Self::Dom => "dom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("District {0} doesn't exist")]
    UnknownDistrict(String),
    #[error("district shape has no id attribute")]
    MissingIdentifier,
    #[error("invalid {field} {value:?}: expected a CSS length such as \"15px\"")]
    InvalidDimension { field: &'static str, value: String },
    #[error("No root of such Id exists: {0:?}")]
    RootNotFound(String),
    #[error("map is not loaded yet; await setRoot() first")]
    NotReady,
    #[error("Map took too much time to load ({timeout_ms} ms)")]
    LoadTimeout { timeout_ms: u32 },
    #[error("DOM operation failed: {0}")]
    Dom(String),
}

impl MapError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::UnknownDistrict(_) => ErrorKind::UnknownDistrict,
            Self::MissingIdentifier => ErrorKind::MissingIdentifier,
            Self::InvalidDimension { .. } => ErrorKind::InvalidDimension,
            Self::RootNotFound(_) => ErrorKind::RootNotFound,
            Self::NotReady => ErrorKind::NotReady,
            Self::LoadTimeout { .. } => ErrorKind::LoadTimeout,
            Self::Dom(_) => ErrorKind::Dom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_district_message_names_the_district() {
        let err = MapError::UnknownDistrict("zzz".into());
        assert_eq!(err.to_string(), "District zzz doesn't exist");
        assert_eq!(err.kind(), ErrorKind::UnknownDistrict);
    }

    #[test]
    fn load_timeout_carries_the_budget() {
        let err = MapError::LoadTimeout { timeout_ms: 10_000 };
        assert!(err.to_string().contains("10000"));
        assert_eq!(err.kind().as_str(), "load_timeout");
    }
}
