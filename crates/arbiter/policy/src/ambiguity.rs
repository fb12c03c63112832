//! Randomness for the expressive-ambiguity annotation.
//!
//! Offsets drawn here end up in trace notes only. Nothing that selects a
//! mode or an option may read them.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::PolicyError;

/// Draws an offset uniformly from `[-amplitude, amplitude]`.
pub trait AmbiguitySource: Send + Sync {
    fn draw(&self, amplitude: f64) -> Result<f64, PolicyError>;
}

fn check_amplitude(amplitude: f64) -> Result<(), PolicyError> {
    if !amplitude.is_finite() || amplitude < 0.0 {
        return Err(PolicyError::InvalidAmplitude(amplitude));
    }
    Ok(())
}

/// Thread-local OS-seeded generator.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRngSource;

impl AmbiguitySource for ThreadRngSource {
    fn draw(&self, amplitude: f64) -> Result<f64, PolicyError> {
        check_amplitude(amplitude)?;
        if amplitude == 0.0 {
            return Ok(0.0);
        }
        Ok(rand::thread_rng().gen_range(-amplitude..=amplitude))
    }
}

/// Reproducible generator for replays and fixtures.
pub struct SeededSource {
    rng: Mutex<StdRng>,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl AmbiguitySource for SeededSource {
    fn draw(&self, amplitude: f64) -> Result<f64, PolicyError> {
        check_amplitude(amplitude)?;
        if amplitude == 0.0 {
            return Ok(0.0);
        }
        Ok(self.rng.lock().gen_range(-amplitude..=amplitude))
    }
}

/// Always yields the same offset, clamped into `[-amplitude, amplitude]`.
#[derive(Clone, Copy, Debug)]
pub struct FixedOffset(pub f64);

impl AmbiguitySource for FixedOffset {
    fn draw(&self, amplitude: f64) -> Result<f64, PolicyError> {
        check_amplitude(amplitude)?;
        if !self.0.is_finite() {
            return Err(PolicyError::RandomnessUnavailable(format!(
                "fixed offset {} is not finite",
                self.0
            )));
        }
        Ok(self.0.clamp(-amplitude, amplitude))
    }
}
