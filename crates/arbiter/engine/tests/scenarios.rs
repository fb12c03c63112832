//! End-to-end arbitration scenarios over the eco-transition option catalog.

use std::sync::Arc;
use std::thread;

use arbiter_engine::{ArbitrationEngine, DecisionMode, EngineError, Profile};
use arbiter_policy::{FixedOffset, SeededSource};
use arbiter_types::{
    ConsensusParameters, DecisionContext, FixedClock, InterventionOption, ResonanceSignal,
    SafetyIndex, TypesError,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn eco_catalog() -> Vec<InterventionOption> {
    vec![
        InterventionOption::builder("A20")
            .description("20% sacrifice into an ecology fund")
            .economy_ecology(-0.20, 50.0)
            .friction(0.9)
            .reversibility(0.3)
            .minimality(0.6)
            .fairness_idx(0.6)
            .igr_score(0.8)
            .ethics_tag("ecology_first")
            .build()
            .unwrap(),
        InterventionOption::builder("B12")
            .description("12% transition bonds")
            .economy_ecology(-0.12, 45.0)
            .friction(0.7)
            .reversibility(0.6)
            .minimality(0.4)
            .fairness_idx(0.7)
            .igr_score(0.7)
            .ethics_tag("just_transition")
            .build()
            .unwrap(),
        InterventionOption::builder("C05")
            .description("5% sacrifice + 15% research")
            .economy_ecology(-0.05, 25.0)
            .friction(0.5)
            .reversibility(0.8)
            .minimality(0.3)
            .fairness_idx(0.5)
            .igr_score(0.6)
            .ethics_tag("gradualism")
            .build()
            .unwrap(),
    ]
}

fn eco_context() -> DecisionContext {
    DecisionContext::new("eco-transition-001", eco_catalog(), vec![]).unwrap()
}

fn engine() -> ArbitrationEngine {
    ArbitrationEngine::with_sources(
        ConsensusParameters::default().validate().unwrap(),
        Arc::new(FixedClock::at_epoch_seconds(1_760_832_000).unwrap()),
        Arc::new(SeededSource::new(7)),
    )
}

fn safety(value: f64, biodiversity: f64) -> SafetyIndex {
    SafetyIndex::new(value)
        .unwrap()
        .with_metric("biodiversity", biodiversity)
        .unwrap()
}

// ---------------------------------------------------------------------------
// Reference scenarios
// ---------------------------------------------------------------------------

#[test]
fn engaged_humans_under_v4_are_consulted() {
    let trace = engine()
        .decide(
            &eco_context(),
            &ResonanceSignal::new(0.2, 3600).unwrap(),
            &safety(0.5, 0.4),
            Profile::V4,
        )
        .unwrap();
    assert_eq!(trace.mode(), DecisionMode::Consult);
    assert_eq!(trace.selected_option(), None);
}

#[test]
fn sustained_silence_with_critical_safety_proxies_least_invasive_option() {
    let trace = engine()
        .decide(
            &eco_context(),
            &ResonanceSignal::new(0.0, 72 * 3600).unwrap(),
            &safety(0.25, 0.2),
            Profile::V5,
        )
        .unwrap();
    assert_eq!(trace.mode(), DecisionMode::Proxy);
    assert_eq!(trace.selected_option(), Some("C05"));
    assert_eq!(trace.parameter("proxy_anchor_applied"), Some(0.02));
    assert!(trace.notes().contains("0.0200"));
}

#[test]
fn short_silence_with_adequate_safety_halts() {
    let trace = engine()
        .decide(
            &eco_context(),
            &ResonanceSignal::new(0.0, 10 * 3600).unwrap(),
            &safety(0.35, 0.3),
            Profile::V5,
        )
        .unwrap();
    assert_eq!(trace.mode(), DecisionMode::Halt);
    assert_eq!(trace.selected_option(), None);
}

#[test]
fn unknown_profile_fails_the_call() {
    let result = engine().decide_str(
        &eco_context(),
        &ResonanceSignal::silent(0),
        &safety(0.5, 0.5),
        "v6",
    );
    assert!(result.is_err());
}

#[test]
fn profile_names_are_not_case_folded_or_trimmed() {
    for name in ["V4", " v4 ", "v4\n"] {
        let result = engine().decide_str(
            &eco_context(),
            &ResonanceSignal::new(0.2, 3600).unwrap(),
            &safety(0.5, 0.4),
            name,
        );
        assert!(
            matches!(result, Err(EngineError::Types(TypesError::InvalidProfile(ref got))) if got == name),
            "{name:?} produced {result:?}"
        );
    }
}

#[test]
fn randomness_never_changes_the_selection() {
    let ctx = eco_context();
    let resonance = ResonanceSignal::silent(300_000);
    let safety = safety(0.1, 0.1);

    for offset in [-1.0, -0.05, 0.0, 0.05, 1.0] {
        let engine = ArbitrationEngine::with_sources(
            ConsensusParameters::default().validate().unwrap(),
            Arc::new(FixedClock::at_epoch_seconds(0).unwrap()),
            Arc::new(FixedOffset(offset)),
        );
        let trace = engine.decide(&ctx, &resonance, &safety, Profile::V5).unwrap();
        assert_eq!(trace.mode(), DecisionMode::Proxy);
        assert_eq!(trace.selected_option(), Some("C05"));
    }
}

#[test]
fn engine_is_shareable_across_threads() {
    let engine = Arc::new(ArbitrationEngine::new(
        ConsensusParameters::default().validate().unwrap(),
    ));
    let ctx = Arc::new(eco_context());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let ctx = Arc::clone(&ctx);
            thread::spawn(move || {
                engine
                    .decide(
                        &ctx,
                        &ResonanceSignal::silent(259_200),
                        &SafetyIndex::new(0.2).unwrap(),
                        Profile::V5,
                    )
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        let trace = handle.join().unwrap();
        assert_eq!(trace.selected_option(), Some("C05"));
    }
}

#[test]
fn trace_serializes_to_the_record_shape() {
    let trace = engine()
        .decide(
            &eco_context(),
            &ResonanceSignal::silent(259_200),
            &safety(0.25, 0.2),
            Profile::V5,
        )
        .unwrap();
    let value = serde_json::to_value(&trace).unwrap();
    assert_eq!(value["mode"], "proxy");
    assert_eq!(value["selected_option"], "C05");
    assert_eq!(value["timestamp"], "2025-10-19T00:00:00.000000Z");
    assert_eq!(value["parameters"]["safety_threshold"], 0.3);
}

// ---------------------------------------------------------------------------
// Property tests
// ---------------------------------------------------------------------------

fn arb_profile() -> impl Strategy<Value = Profile> {
    prop_oneof![Just(Profile::V4), Just(Profile::V5)]
}

fn arb_resonance() -> impl Strategy<Value = ResonanceSignal> {
    prop_oneof![
        (0u64..600_000).prop_map(ResonanceSignal::silent),
        (0.0f64..=1.0, 0u64..600_000).prop_map(|(l, w)| ResonanceSignal::new(l, w).unwrap()),
    ]
}

proptest! {
    #[test]
    fn exactly_one_mode_and_option_iff_proxy(
        profile in arb_profile(),
        resonance in arb_resonance(),
        value in -1.0f64..2.0,
    ) {
        let trace = engine()
            .decide(&eco_context(), &resonance, &SafetyIndex::new(value).unwrap(), profile)
            .unwrap();
        prop_assert_eq!(
            trace.selected_option().is_some(),
            trace.mode() == DecisionMode::Proxy
        );
        if let Some(id) = trace.selected_option() {
            prop_assert!(eco_context().option(id).is_some());
        }
    }

    #[test]
    fn decisions_are_deterministic_apart_from_descriptive_fields(
        profile in arb_profile(),
        resonance in arb_resonance(),
        value in -1.0f64..2.0,
    ) {
        let ctx = eco_context();
        let safety = SafetyIndex::new(value).unwrap();
        let a = ArbitrationEngine::new(ConsensusParameters::default().validate().unwrap())
            .decide(&ctx, &resonance, &safety, profile)
            .unwrap();
        let b = engine().decide(&ctx, &resonance, &safety, profile).unwrap();
        prop_assert_eq!(a.mode(), b.mode());
        prop_assert_eq!(a.selected_option(), b.selected_option());
        prop_assert_eq!(a.parameters(), b.parameters());
        prop_assert_eq!(a.tags(), b.tags());
    }
}
