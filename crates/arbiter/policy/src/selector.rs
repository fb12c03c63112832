//! Minimal-intervention selection.
//!
//! Options are ordered by the composite key
//! `(1 - reversibility, minimality, friction)` ascending: most reversible
//! first, then least structurally invasive, then lowest friction. Equal keys
//! fall back to input position, so the order is total and deterministic.

use std::cmp::Ordering;

use arbiter_types::InterventionOption;
use tracing::debug;

use crate::error::PolicyError;

/// Picks the least invasive option from a candidate set.
#[derive(Clone, Copy, Debug, Default)]
pub struct MinimalInterventionSelector;

impl MinimalInterventionSelector {
    pub fn new() -> Self {
        Self
    }

    fn compare(a: (usize, &InterventionOption), b: (usize, &InterventionOption)) -> Ordering {
        let (ia, a) = a;
        let (ib, b) = b;
        (1.0 - a.reversibility())
            .total_cmp(&(1.0 - b.reversibility()))
            .then_with(|| a.minimality().total_cmp(&b.minimality()))
            .then_with(|| a.friction().total_cmp(&b.friction()))
            .then_with(|| ia.cmp(&ib))
    }

    /// The full ordering, least invasive first.
    pub fn rank<'a>(&self, options: &'a [InterventionOption]) -> Vec<&'a InterventionOption> {
        let mut indexed: Vec<(usize, &InterventionOption)> = options.iter().enumerate().collect();
        indexed.sort_by(|a, b| Self::compare(*a, *b));
        indexed.into_iter().map(|(_, option)| option).collect()
    }

    pub fn choose<'a>(
        &self,
        options: &'a [InterventionOption],
    ) -> Result<&'a InterventionOption, PolicyError> {
        let chosen = options
            .iter()
            .enumerate()
            .min_by(|a, b| Self::compare(*a, *b))
            .map(|(_, option)| option)
            .ok_or(PolicyError::EmptyOptionSet)?;
        debug!(
            option = chosen.id(),
            candidates = options.len(),
            "minimal intervention selected"
        );
        Ok(chosen)
    }
}
