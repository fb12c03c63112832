use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// Observed human engagement.
///
/// `level == 0.0` is total silence; `window_sec` is how long the current
/// state has persisted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawResonanceSignal")]
pub struct ResonanceSignal {
    level: f64,
    window_sec: u64,
}

#[derive(Deserialize)]
struct RawResonanceSignal {
    level: f64,
    window_sec: u64,
}

impl TryFrom<RawResonanceSignal> for ResonanceSignal {
    type Error = TypesError;

    fn try_from(raw: RawResonanceSignal) -> Result<Self, Self::Error> {
        Self::new(raw.level, raw.window_sec)
    }
}

impl ResonanceSignal {
    /// Build a snapshot; `level` must be finite and within `[0, 1]`.
    pub fn new(level: f64, window_sec: u64) -> Result<Self, TypesError> {
        if !level.is_finite() || !(0.0..=1.0).contains(&level) {
            return Err(TypesError::InvalidSignal(format!(
                "resonance level {level} outside [0, 1]"
            )));
        }
        Ok(Self { level, window_sec })
    }

    /// A fully silent signal that has persisted for `window_sec`.
    pub fn silent(window_sec: u64) -> Self {
        Self {
            level: 0.0,
            window_sec,
        }
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn window_sec(&self) -> u64 {
        self.window_sec
    }

    pub fn is_silent(&self) -> bool {
        self.level == 0.0
    }
}

/// Structural safety snapshot. Lower `value` is more dangerous.
///
/// `metrics` is diagnostic detail carried alongside the index; the decision
/// rule reads `value` only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSafetyIndex")]
pub struct SafetyIndex {
    value: f64,
    metrics: BTreeMap<String, f64>,
}

#[derive(Deserialize)]
struct RawSafetyIndex {
    value: f64,
    #[serde(default)]
    metrics: BTreeMap<String, f64>,
}

impl TryFrom<RawSafetyIndex> for SafetyIndex {
    type Error = TypesError;

    fn try_from(raw: RawSafetyIndex) -> Result<Self, Self::Error> {
        raw.metrics
            .into_iter()
            .try_fold(Self::new(raw.value)?, |index, (name, value)| {
                index.with_metric(name, value)
            })
    }
}

impl SafetyIndex {
    pub fn new(value: f64) -> Result<Self, TypesError> {
        if !value.is_finite() {
            return Err(TypesError::InvalidSignal(format!(
                "safety value {value} is not finite"
            )));
        }
        Ok(Self {
            value,
            metrics: BTreeMap::new(),
        })
    }

    /// Attach a named diagnostic metric.
    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Result<Self, TypesError> {
        let name = name.into();
        if !value.is_finite() {
            return Err(TypesError::InvalidSignal(format!(
                "safety metric {name} is not finite"
            )));
        }
        self.metrics.insert(name, value);
        Ok(self)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn metrics(&self) -> &BTreeMap<String, f64> {
        &self.metrics
    }
}
