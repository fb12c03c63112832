//! `arbiter decide`

use std::fs;
use std::path::{Path, PathBuf};

use arbiter_engine::{ArbitrationEngine, Profile};
use arbiter_policy::SilenceAuthorization;
use arbiter_types::{DecisionContext, ResonanceSignal, SafetyIndex};
use clap::Args;

use crate::config::ArbiterConfig;
use crate::error::{CliError, CliResult};
use crate::output::{print_json, print_success};

#[derive(Args, Debug)]
pub struct DecideArgs {
    /// JSON file holding the decision context (id, options, lineage_refs)
    #[arg(long, value_name = "FILE")]
    pub context: PathBuf,

    /// Human resonance level in [0, 1]
    #[arg(long)]
    pub level: f64,

    /// Length of the observation window in seconds
    #[arg(long)]
    pub window_sec: u64,

    /// Structural safety index
    #[arg(long)]
    pub safety: f64,

    /// Additional named safety metric (repeatable)
    #[arg(long = "metric", value_name = "NAME=VALUE")]
    pub metrics: Vec<String>,

    /// Policy profile: v4 (dialogue-first) or v5 (governance)
    #[arg(long)]
    pub profile: String,

    /// Append the trace to the audit log
    #[arg(long)]
    pub append: bool,

    /// Explain each rule check on stderr
    #[arg(long)]
    pub explain: bool,
}

pub fn execute(args: DecideArgs, config: &ArbiterConfig) -> CliResult<()> {
    // Nothing is printed unless the requested append can also happen.
    let log = if args.append {
        Some(super::open_log(config)?)
    } else {
        None
    };

    let context = load_context(&args.context)?;
    let resonance = ResonanceSignal::new(args.level, args.window_sec)?;
    let mut safety = SafetyIndex::new(args.safety)?;
    for metric in &args.metrics {
        let (name, value) = parse_metric(metric)?;
        safety = safety.with_metric(name, value)?;
    }

    let engine = super::engine(config)?;
    let trace = engine.decide_str(&context, &resonance, &safety, &args.profile)?;
    let record = log.map(|log| log.append(&trace)).transpose()?;

    if args.explain {
        explain(&engine, &context, &resonance, &safety, &args.profile);
    }
    print_json(&trace)?;

    if let Some(record) = record {
        print_success(&format!(
            "appended {} to {} (digest {})",
            trace.decision_id(),
            config.audit.log_path.display(),
            &record.digest[..12]
        ));
    }
    Ok(())
}

pub fn load_context(path: &Path) -> CliResult<DecisionContext> {
    let raw = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CliError::Context {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_metric(metric: &str) -> CliResult<(&str, f64)> {
    let invalid = || CliError::InvalidMetric(metric.to_string());
    let (name, value) = metric.split_once('=').ok_or_else(invalid)?;
    let value = value.trim().parse::<f64>().map_err(|_| invalid())?;
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid());
    }
    Ok((name, value))
}

fn explain(
    engine: &ArbitrationEngine,
    context: &DecisionContext,
    resonance: &ResonanceSignal,
    safety: &SafetyIndex,
    profile: &str,
) {
    let params = engine.parameters();
    let silence = SilenceAuthorization::new(params);
    let profile = profile.parse::<Profile>().map(|p| p.to_string());

    eprintln!("profile: {}", profile.as_deref().unwrap_or("?"));
    eprintln!(
        "consult check: level {} > anchor base {} -> {}",
        resonance.level(),
        params.anchor_weight_base,
        resonance.level() > params.anchor_weight_base
    );
    eprintln!(
        "silence check: silent={} window {}s >= {}s -> {}",
        resonance.is_silent(),
        resonance.window_sec(),
        silence.silence_threshold_sec(),
        silence.silence_expired(resonance)
    );
    eprintln!(
        "safety check: {} < {} -> {}",
        safety.value(),
        silence.safety_critical_threshold(),
        silence.structurally_critical(safety)
    );
    eprintln!("minimal-intervention ranking (1-reversibility, minimality, friction):");
    for (rank, option) in engine.selector().rank(context.options()).iter().enumerate() {
        eprintln!(
            "  {}. {} ({:.2}, {:.2}, {:.2})",
            rank + 1,
            option.id(),
            1.0 - option.reversibility(),
            option.minimality(),
            option.friction()
        );
    }
}
