use arbiter_policy::PolicyError;
use arbiter_types::{ClockError, TypesError};
use thiserror::Error;

/// Errors that fail a single `decide` call outright.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Types(#[from] TypesError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Clock(#[from] ClockError),
}
