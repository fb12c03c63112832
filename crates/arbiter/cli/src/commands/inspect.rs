//! `arbiter inspect`

use clap::Args;

use crate::config::ArbiterConfig;
use crate::error::CliResult;
use crate::output::{print_json, print_records, RecordRow};

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Print the well-formed records as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: InspectArgs, config: &ArbiterConfig) -> CliResult<()> {
    let log = super::open_log(config)?;
    if args.json {
        return print_json(&log.records()?);
    }

    let rows = log
        .entries()?
        .iter()
        .enumerate()
        .map(|(position, entry)| RecordRow::from_entry(position, entry))
        .collect();
    print_records(rows);
    Ok(())
}
