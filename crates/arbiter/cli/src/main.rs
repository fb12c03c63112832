//! Arbiter CLI
//!
//! Runs arbitration decisions and manages the tamper-evident decision log:
//! - `decide` evaluates one context and optionally appends the trace
//! - `verify` checks every record digest in the log
//! - `inspect` lists the stored records
//! - `demo` runs the eco-transition reference scenarios

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

use commands::{decide, demo, inspect, verify};
use config::{ArbiterConfig, LoggingConfig};

/// Arbiter CLI application
#[derive(Parser)]
#[command(name = "arbiter")]
#[command(about = "Arbiter - consult / proxy / halt arbitration with a tamper-evident log", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ARBITER_CONFIG")]
    config: Option<String>,

    /// Audit log path (overrides audit.log_path)
    #[arg(long, global = true)]
    log_path: Option<PathBuf>,

    /// Log level (overrides logging.level)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Evaluate one decision context
    Decide(decide::DecideArgs),

    /// Verify every record in the audit log
    Verify(verify::VerifyArgs),

    /// List the records in the audit log
    Inspect(inspect::InspectArgs),

    /// Run the eco-transition reference scenarios
    Demo(demo::DemoArgs),
}

fn init_tracing(logging: &LoggingConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.level.clone().into());

    if logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = ArbiterConfig::load(cli.config.as_deref())
        .with_context(|| format!("loading configuration {:?}", cli.config))?;
    if let Some(path) = cli.log_path {
        config.audit.log_path = path;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.log_json {
        config.logging.json = true;
    }

    init_tracing(&config.logging);

    let code = match cli.command {
        Commands::Decide(args) => decide::execute(args, &config).map(|()| ExitCode::SUCCESS),
        Commands::Verify(args) => verify::execute(args, &config).map(|intact| {
            if intact {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }),
        Commands::Inspect(args) => inspect::execute(args, &config).map(|()| ExitCode::SUCCESS),
        Commands::Demo(args) => demo::execute(args, &config).map(|()| ExitCode::SUCCESS),
    };

    match code {
        Ok(code) => Ok(code),
        Err(err) => {
            output::print_error(&err.to_string());
            Ok(ExitCode::from(2))
        }
    }
}
