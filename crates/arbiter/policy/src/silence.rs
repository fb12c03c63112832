use arbiter_types::{ResonanceSignal, SafetyIndex, ValidatedParameters};
use tracing::debug;

/// Silence authorization protocol.
///
/// Proxy action is structurally authorized only when BOTH hold:
///
/// 1. humans have been fully silent (`level == 0`) for at least the
///    silence threshold, and
/// 2. the safety index is strictly below the critical threshold.
///
/// Silence alone never authorizes anything. Only exact zero counts as
/// silent; there is no tolerance band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SilenceAuthorization {
    silence_threshold_sec: u64,
    safety_critical_threshold: f64,
}

impl SilenceAuthorization {
    pub fn new(params: &ValidatedParameters) -> Self {
        Self {
            silence_threshold_sec: params.silence_threshold_sec,
            safety_critical_threshold: params.safety_critical_threshold,
        }
    }

    pub fn safety_critical_threshold(&self) -> f64 {
        self.safety_critical_threshold
    }

    pub fn silence_threshold_sec(&self) -> u64 {
        self.silence_threshold_sec
    }

    /// Sustained total silence.
    pub fn silence_expired(&self, resonance: &ResonanceSignal) -> bool {
        resonance.is_silent() && resonance.window_sec() >= self.silence_threshold_sec
    }

    /// Structural necessity: safety strictly below the critical threshold.
    pub fn structurally_critical(&self, safety: &SafetyIndex) -> bool {
        safety.value() < self.safety_critical_threshold
    }

    pub fn authorize_proxy(&self, resonance: &ResonanceSignal, safety: &SafetyIndex) -> bool {
        let silent = self.silence_expired(resonance);
        let critical = self.structurally_critical(safety);
        debug!(
            level = resonance.level(),
            window_sec = resonance.window_sec(),
            safety = safety.value(),
            silent,
            critical,
            "silence authorization evaluated"
        );
        silent && critical
    }
}
