use arbiter_types::ValidatedParameters;

use crate::ambiguity::AmbiguitySource;
use crate::error::PolicyError;

/// Anchor-weight bounds.
///
/// The anchor weight is how strongly the autonomous pathway may act without
/// consultation; it is always held inside the consensus range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorPolicy {
    range_min: f64,
    range_max: f64,
}

impl AnchorPolicy {
    pub fn new(params: &ValidatedParameters) -> Self {
        Self {
            range_min: params.anchor_range_min,
            range_max: params.anchor_range_max,
        }
    }

    /// Clamp `value` into `[anchor_range_min, anchor_range_max]`.
    ///
    /// Total: NaN maps to the lower bound.
    pub fn clamp_anchor(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.range_min;
        }
        value.max(self.range_min).min(self.range_max)
    }

    pub fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }

    /// Render the expressive-ambiguity annotation.
    ///
    /// The offset is drawn from `source` and appears in the returned text only.
    pub fn expressive_ambiguity_note(
        &self,
        amplitude: f64,
        source: &dyn AmbiguitySource,
    ) -> Result<String, PolicyError> {
        let delta = source.draw(amplitude)?;
        Ok(format!(
            "expressive ambiguity (±{amplitude:.2}), offset={delta:+.4}"
        ))
    }
}
