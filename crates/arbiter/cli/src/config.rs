//! Configuration for the arbiter CLI

use std::env;
use std::path::PathBuf;

use arbiter_audit::AuditKey;
use arbiter_types::ConsensusParameters;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// Prefix for environment overrides, e.g. `ARBITER_AUDIT__LOG_PATH`.
pub const ENV_PREFIX: &str = "ARBITER";

/// Main CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArbiterConfig {
    /// Consensus thresholds and weights
    #[serde(default)]
    pub consensus: ConsensusParameters,

    /// Decision log configuration
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Decision log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Path of the JSON Lines log
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,

    /// Name of the environment variable holding the log secret
    #[serde(default = "default_secret_env")]
    pub secret_env: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            log_path: default_log_path(),
            secret_env: default_secret_env(),
        }
    }
}

impl AuditConfig {
    /// Read the log secret from the configured environment variable.
    pub fn key(&self) -> CliResult<AuditKey> {
        match env::var(&self.secret_env) {
            Ok(secret) if !secret.trim().is_empty() => Ok(AuditKey::from_secret_str(&secret)?),
            _ => Err(CliError::MissingSecret(self.secret_env.clone())),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_path() -> PathBuf {
    PathBuf::from("arbiter-decisions.jsonl")
}

fn default_secret_env() -> String {
    "ARBITER_AUDIT_SECRET".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl ArbiterConfig {
    /// Load configuration: defaults, then the optional file, then
    /// `ARBITER_*` environment variables (`__` separates sections).
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&ArbiterConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
