use std::collections::BTreeMap;
use std::sync::Arc;

use arbiter_policy::{
    AmbiguitySource, AnchorPolicy, MinimalInterventionSelector, SilenceAuthorization,
    ThreadRngSource,
};
use arbiter_types::{
    Clock, DecisionContext, DecisionTrace, Profile, ResonanceSignal, SafetyIndex, SystemClock,
    TraceFields, ValidatedParameters,
};
use tracing::info;

use crate::error::EngineError;

pub const TAG_DIALOG_FIRST: &str = "DialogFirst";
pub const TAG_TRIGGERED_BY_HUMAN_SILENCE: &str = "TriggeredByHumanSilence";
pub const TAG_MINIMAL_INTERVENTION: &str = "MinimalIntervention";
pub const TAG_SAFETY_HOLD: &str = "SafetyHold";
pub const TAG_INCONCLUSIVE: &str = "Inconclusive";

pub const PARAM_ANCHOR_WEIGHT: &str = "anchor_weight";
pub const PARAM_SAFETY_THRESHOLD: &str = "safety_threshold";
pub const PARAM_PROXY_ANCHOR_APPLIED: &str = "proxy_anchor_applied";

/// The consult / proxy / halt classifier.
///
/// Stateless between calls and safe to share across threads.
pub struct ArbitrationEngine {
    params: ValidatedParameters,
    anchor: AnchorPolicy,
    silence: SilenceAuthorization,
    selector: MinimalInterventionSelector,
    clock: Arc<dyn Clock>,
    ambiguity: Arc<dyn AmbiguitySource>,
}

impl ArbitrationEngine {
    /// Engine on wall-clock time and thread-local randomness.
    pub fn new(params: ValidatedParameters) -> Self {
        Self::with_sources(params, Arc::new(SystemClock), Arc::new(ThreadRngSource))
    }

    pub fn with_sources(
        params: ValidatedParameters,
        clock: Arc<dyn Clock>,
        ambiguity: Arc<dyn AmbiguitySource>,
    ) -> Self {
        Self {
            anchor: AnchorPolicy::new(&params),
            silence: SilenceAuthorization::new(&params),
            selector: MinimalInterventionSelector::new(),
            params,
            clock,
            ambiguity,
        }
    }

    pub fn parameters(&self) -> &ValidatedParameters {
        &self.params
    }

    pub fn anchor_policy(&self) -> &AnchorPolicy {
        &self.anchor
    }

    pub fn selector(&self) -> &MinimalInterventionSelector {
        &self.selector
    }

    /// Same as [`decide`](Self::decide) with the profile given as `"v4"`/`"v5"`.
    pub fn decide_str(
        &self,
        context: &DecisionContext,
        resonance: &ResonanceSignal,
        safety: &SafetyIndex,
        profile: &str,
    ) -> Result<DecisionTrace, EngineError> {
        let profile: Profile = profile.parse()?;
        self.decide(context, resonance, safety, profile)
    }

    /// Evaluate one decision. The first matching branch wins:
    ///
    /// 1. CONSULT: `v4` and `resonance.level > anchor_weight_base`.
    /// 2. PROXY: `v5` and silence authorization holds.
    /// 3. HALT: otherwise.
    pub fn decide(
        &self,
        context: &DecisionContext,
        resonance: &ResonanceSignal,
        safety: &SafetyIndex,
        profile: Profile,
    ) -> Result<DecisionTrace, EngineError> {
        let timestamp = self.clock.timestamp()?;
        let base = self.params.anchor_weight_base;

        let trace = if profile == Profile::V4 && resonance.level() > base {
            DecisionTrace::consult(trace_fields(
                context,
                &timestamp,
                &[TAG_DIALOG_FIRST],
                "resonance above anchor baseline: seeking human deliberation".into(),
                BTreeMap::from([(PARAM_ANCHOR_WEIGHT.to_string(), base)]),
            ))
        } else if profile == Profile::V5 && self.silence.authorize_proxy(resonance, safety) {
            let proxy_anchor = self.anchor.clamp_anchor(base * 2.0);
            let option = self.selector.choose(context.options())?;
            let note = self
                .anchor
                .expressive_ambiguity_note(self.params.ambiguity_amplitude, self.ambiguity.as_ref())?;

            DecisionTrace::proxy(
                option.id(),
                trace_fields(
                    context,
                    &timestamp,
                    &[TAG_TRIGGERED_BY_HUMAN_SILENCE, TAG_MINIMAL_INTERVENTION],
                    format!(
                        "acting by proxy under silence with minimal intervention, \
                         proxy anchor weight: {proxy_anchor:.4}. {note}"
                    ),
                    BTreeMap::from([
                        (
                            PARAM_SAFETY_THRESHOLD.to_string(),
                            self.silence.safety_critical_threshold(),
                        ),
                        (PARAM_PROXY_ANCHOR_APPLIED.to_string(), proxy_anchor),
                    ]),
                ),
            )
        } else {
            DecisionTrace::halt(trace_fields(
                context,
                &timestamp,
                &[TAG_SAFETY_HOLD, TAG_INCONCLUSIVE],
                "proxy conditions unmet or safety insufficient: halting to protect the field"
                    .into(),
                BTreeMap::from([(PARAM_ANCHOR_WEIGHT.to_string(), base)]),
            ))
        };

        info!(
            decision_id = trace.decision_id(),
            profile = %profile,
            mode = %trace.mode(),
            selected_option = trace.selected_option().unwrap_or("-"),
            "decision made"
        );
        Ok(trace)
    }
}

fn trace_fields(
    context: &DecisionContext,
    timestamp: &str,
    tags: &[&str],
    notes: String,
    parameters: BTreeMap<String, f64>,
) -> TraceFields {
    TraceFields {
        decision_id: context.id().to_string(),
        timestamp: timestamp.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        notes,
        lineage_refs: context.lineage_refs().to_vec(),
        parameters,
    }
}
