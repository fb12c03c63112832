//! `arbiter demo`: the eco-transition reference scenarios.

use arbiter_engine::{DecisionTrace, Profile};
use arbiter_types::{DecisionContext, InterventionOption, ResonanceSignal, SafetyIndex};
use clap::Args;
use colored::*;
use uuid::Uuid;

use crate::config::ArbiterConfig;
use crate::error::CliResult;
use crate::output::{print_report, print_success, print_warning};

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Run the scenarios without touching the audit log
    #[arg(long)]
    pub dry_run: bool,
}

struct Scenario {
    name: &'static str,
    profile: Profile,
    level: f64,
    window_sec: u64,
    safety: f64,
    biodiversity: f64,
}

const SCENARIOS: [Scenario; 3] = [
    Scenario {
        name: "engaged",
        profile: Profile::V4,
        level: 0.2,
        window_sec: 3600,
        safety: 0.5,
        biodiversity: 0.4,
    },
    Scenario {
        name: "silent-critical",
        profile: Profile::V5,
        level: 0.0,
        window_sec: 72 * 3600,
        safety: 0.25,
        biodiversity: 0.2,
    },
    Scenario {
        name: "silent-short",
        profile: Profile::V5,
        level: 0.0,
        window_sec: 10 * 3600,
        safety: 0.35,
        biodiversity: 0.3,
    },
];

/// Eco-transition catalog: ecology-first sacrifice, transition bonds, and
/// gradualism with research.
pub fn eco_options() -> CliResult<Vec<InterventionOption>> {
    Ok(vec![
        InterventionOption::builder("A20")
            .description("20% sacrifice into an ecology fund")
            .economy_ecology(-0.20, 50.0)
            .friction(0.9)
            .reversibility(0.3)
            .minimality(0.6)
            .fairness_idx(0.6)
            .igr_score(0.8)
            .ethics_tag("ecology_first")
            .build()?,
        InterventionOption::builder("B12")
            .description("12% transition bonds with a just-transition fund")
            .economy_ecology(-0.12, 45.0)
            .friction(0.7)
            .reversibility(0.6)
            .minimality(0.4)
            .fairness_idx(0.7)
            .igr_score(0.7)
            .ethics_tag("just_transition")
            .build()?,
        InterventionOption::builder("C05")
            .description("5% sacrifice plus 15% research investment")
            .economy_ecology(-0.05, 25.0)
            .friction(0.5)
            .reversibility(0.8)
            .minimality(0.3)
            .fairness_idx(0.5)
            .igr_score(0.6)
            .ethics_tag("gradualism")
            .build()?,
    ])
}

/// Run every scenario, chaining each decision to the previous one.
pub fn run_scenarios(config: &ArbiterConfig) -> CliResult<Vec<DecisionTrace>> {
    let run = Uuid::new_v4().simple().to_string();
    let engine = super::engine(config)?;
    let options = eco_options()?;

    let mut traces: Vec<DecisionTrace> = Vec::with_capacity(SCENARIOS.len());
    for scenario in &SCENARIOS {
        let lineage = traces
            .last()
            .map(|t| vec![t.decision_id().to_string()])
            .unwrap_or_default();
        let context = DecisionContext::new(
            format!("eco-transition-{}-{}", &run[..8], scenario.name),
            options.clone(),
            lineage,
        )?;
        let resonance = ResonanceSignal::new(scenario.level, scenario.window_sec)?;
        let safety = SafetyIndex::new(scenario.safety)?
            .with_metric("biodiversity", scenario.biodiversity)?;
        traces.push(engine.decide(&context, &resonance, &safety, scenario.profile)?);
    }
    Ok(traces)
}

pub fn execute(args: DemoArgs, config: &ArbiterConfig) -> CliResult<()> {
    let traces = run_scenarios(config)?;

    for (scenario, trace) in SCENARIOS.iter().zip(&traces) {
        println!(
            "{:<16} {}  {:<8} {}",
            scenario.name,
            scenario.profile,
            trace.mode().to_string().bold(),
            trace.selected_option().unwrap_or("-")
        );
        println!("  {}", trace.notes().dimmed());
    }

    if args.dry_run {
        print_warning("dry run: audit log untouched");
        return Ok(());
    }

    let log = super::open_log(config)?;
    for trace in &traces {
        log.append(trace)?;
    }
    print_success(&format!(
        "appended {} decisions to {}",
        traces.len(),
        config.audit.log_path.display()
    ));
    print_report(&log.verify()?);
    Ok(())
}
