//! CLI error types

use std::path::PathBuf;

use arbiter_audit::AuditError;
use arbiter_engine::EngineError;
use arbiter_types::TypesError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("audit secret not set: export {0}")]
    MissingSecret(String),

    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid context file {path}: {source}")]
    Context {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid metric {0:?}: expected name=value")]
    InvalidMetric(String),

    #[error(transparent)]
    Types(#[from] TypesError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type CliResult<T> = Result<T, CliError>;
