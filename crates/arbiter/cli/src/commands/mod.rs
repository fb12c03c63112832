//! Subcommand implementations

pub mod decide;
pub mod demo;
pub mod inspect;
pub mod verify;

use arbiter_audit::{FileRecordStore, TamperEvidentLog};
use arbiter_engine::ArbitrationEngine;
use tracing::debug;

use crate::config::ArbiterConfig;
use crate::error::CliResult;

/// Build an engine from the configured consensus parameters.
pub fn engine(config: &ArbiterConfig) -> CliResult<ArbitrationEngine> {
    let params = config.consensus.clone().validate()?;
    Ok(ArbitrationEngine::new(params))
}

/// Open the configured decision log. Fails when the secret is not provisioned.
pub fn open_log(config: &ArbiterConfig) -> CliResult<TamperEvidentLog<FileRecordStore>> {
    let key = config.audit.key()?;
    debug!(path = %config.audit.log_path.display(), "opening audit log");
    Ok(TamperEvidentLog::open(&config.audit.log_path, key)?)
}
