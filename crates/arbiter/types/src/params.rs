//! Consensus-fixed thresholds and weights.
//!
//! Deployments may inject different values through configuration. Every
//! component takes a [`ValidatedParameters`], so range ordering and
//! finiteness are checked once, at startup.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// Raw consensus parameters as read from configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsensusParameters {
    /// Seconds of total silence before proxy action may be authorized.
    #[serde(default = "default_silence_threshold_sec")]
    pub silence_threshold_sec: u64,

    /// Safety values strictly below this are structurally critical.
    #[serde(default = "default_safety_critical_threshold")]
    pub safety_critical_threshold: f64,

    /// Lower bound of the consensus anchor range.
    #[serde(default = "default_anchor_range_min")]
    pub anchor_range_min: f64,

    /// Upper bound of the consensus anchor range.
    #[serde(default = "default_anchor_range_max")]
    pub anchor_range_max: f64,

    /// Baseline anchor weight; engaged resonance above it triggers consultation.
    #[serde(default = "default_anchor_weight_base")]
    pub anchor_weight_base: f64,

    /// Half-width of the offset drawn for the expressive-ambiguity annotation.
    #[serde(default = "default_ambiguity_amplitude")]
    pub ambiguity_amplitude: f64,
}

impl Default for ConsensusParameters {
    fn default() -> Self {
        Self {
            silence_threshold_sec: default_silence_threshold_sec(),
            safety_critical_threshold: default_safety_critical_threshold(),
            anchor_range_min: default_anchor_range_min(),
            anchor_range_max: default_anchor_range_max(),
            anchor_weight_base: default_anchor_weight_base(),
            ambiguity_amplitude: default_ambiguity_amplitude(),
        }
    }
}

// 72 hours.
fn default_silence_threshold_sec() -> u64 {
    259_200
}

fn default_safety_critical_threshold() -> f64 {
    0.30
}

fn default_anchor_range_min() -> f64 {
    0.005
}

fn default_anchor_range_max() -> f64 {
    0.02
}

fn default_anchor_weight_base() -> f64 {
    0.01
}

fn default_ambiguity_amplitude() -> f64 {
    0.05
}

impl ConsensusParameters {
    /// Check invariants and seal the parameters for use by the core.
    pub fn validate(self) -> Result<ValidatedParameters, TypesError> {
        let floats = [
            ("safety_critical_threshold", self.safety_critical_threshold),
            ("anchor_range_min", self.anchor_range_min),
            ("anchor_range_max", self.anchor_range_max),
            ("anchor_weight_base", self.anchor_weight_base),
            ("ambiguity_amplitude", self.ambiguity_amplitude),
        ];
        if let Some((name, value)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(TypesError::InvalidParameters(format!(
                "{name} must be finite, got {value}"
            )));
        }

        if self.anchor_range_min > self.anchor_range_max {
            return Err(TypesError::InvalidParameters(format!(
                "anchor_range_min ({}) exceeds anchor_range_max ({})",
                self.anchor_range_min, self.anchor_range_max
            )));
        }

        if self.ambiguity_amplitude < 0.0 {
            return Err(TypesError::InvalidParameters(format!(
                "ambiguity_amplitude must be non-negative, got {}",
                self.ambiguity_amplitude
            )));
        }

        Ok(ValidatedParameters(self))
    }
}

/// Consensus parameters whose invariants have been checked.
///
/// Only obtainable through [`ConsensusParameters::validate`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidatedParameters(ConsensusParameters);

impl ValidatedParameters {
    pub fn into_inner(self) -> ConsensusParameters {
        self.0
    }
}

impl Default for ValidatedParameters {
    fn default() -> Self {
        ValidatedParameters(ConsensusParameters::default())
    }
}

impl Deref for ValidatedParameters {
    type Target = ConsensusParameters;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
