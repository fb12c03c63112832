use thiserror::Error;

/// Validation errors raised while constructing arbitration inputs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypesError {
    #[error("malformed option {option_id}: {reason}")]
    MalformedOption { option_id: String, reason: String },

    #[error("decision context has no options")]
    EmptyOptionSet,

    #[error("duplicate option id: {0}")]
    DuplicateOptionId(String),

    #[error("invalid profile: {0:?} (expected \"v4\" or \"v5\")")]
    InvalidProfile(String),

    #[error("invalid consensus parameters: {0}")]
    InvalidParameters(String),

    #[error("invalid signal: {0}")]
    InvalidSignal(String),
}

/// The time source could not produce a usable timestamp.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("clock unavailable: {0}")]
pub struct ClockError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_option_display() {
        let err = TypesError::MalformedOption {
            option_id: "A20".into(),
            reason: "missing impact key \"economy\"".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("A20"));
        assert!(msg.contains("economy"));
    }

    #[test]
    fn invalid_profile_display() {
        let err = TypesError::InvalidProfile("v6".into());
        assert_eq!(
            err.to_string(),
            "invalid profile: \"v6\" (expected \"v4\" or \"v5\")"
        );
    }

    #[test]
    fn clock_error_display() {
        let err = ClockError("system time before epoch".into());
        assert_eq!(err.to_string(), "clock unavailable: system time before epoch");
    }
}
