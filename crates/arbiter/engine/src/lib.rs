#![deny(unsafe_code)]
//! # arbiter-engine
//!
//! Three-way arbitration over a snapshot of human-responsiveness and
//! structural-safety signals.
//!
//! Each call to [`ArbitrationEngine::decide`] is one independent evaluation
//! that ends in exactly one of:
//!
//! - **CONSULT**: `v4` profile and humans are engaged above the anchor baseline.
//! - **PROXY**: `v5` profile, sustained total silence and critical safety; the
//!   least invasive option is selected.
//! - **HALT**: anything else.
//!
//! The engine holds no session state. Time and randomness are injected and
//! only ever reach the descriptive fields of the emitted [`DecisionTrace`].

pub mod engine;
pub mod error;

pub use engine::{
    ArbitrationEngine, PARAM_ANCHOR_WEIGHT, PARAM_PROXY_ANCHOR_APPLIED, PARAM_SAFETY_THRESHOLD,
    TAG_DIALOG_FIRST, TAG_INCONCLUSIVE, TAG_MINIMAL_INTERVENTION, TAG_SAFETY_HOLD,
    TAG_TRIGGERED_BY_HUMAN_SILENCE,
};
pub use error::EngineError;

pub use arbiter_types::{DecisionMode, DecisionTrace, Profile};
