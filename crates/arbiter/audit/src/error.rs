//! Error types for the audit log

use arbiter_types::ClockError;
use thiserror::Error;

/// Audit log errors.
///
/// A tampered log is not an error: it is reported through
/// [`VerificationReport`](crate::VerificationReport).
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("record cannot be canonically serialized: {0}")]
    Serialization(String),

    #[error("invalid audit key: {0}")]
    InvalidKey(String),

    #[error("audit store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("audit store JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Clock(#[from] ClockError),
}

/// Result type for audit operations
pub type Result<T> = std::result::Result<T, AuditError>;
