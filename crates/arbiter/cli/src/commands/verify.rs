//! `arbiter verify`

use clap::Args;

use crate::config::ArbiterConfig;
use crate::error::CliResult;
use crate::output::{print_json, print_report};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Returns whether the log is intact.
pub fn execute(args: VerifyArgs, config: &ArbiterConfig) -> CliResult<bool> {
    let report = super::open_log(config)?.verify()?;
    if args.json {
        print_json(&report)?;
    } else {
        print_report(&report);
    }
    Ok(report.is_intact())
}
