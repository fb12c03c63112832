use thiserror::Error;

/// Errors from the policy helpers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    #[error("cannot select from an empty option set")]
    EmptyOptionSet,

    #[error("randomness source unavailable: {0}")]
    RandomnessUnavailable(String),

    #[error("ambiguity amplitude must be finite and non-negative, got {0}")]
    InvalidAmplitude(f64),
}
