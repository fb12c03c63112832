#![deny(unsafe_code)]
//! # arbiter-policy
//!
//! Pure policy helpers the arbitration engine is assembled from.
//!
//! - **AnchorPolicy**: bounds anchor weights to the consensus range and
//!   renders the expressive-ambiguity annotation.
//! - **AmbiguitySource**: injectable randomness behind that annotation. It
//!   only ever feeds explanatory text, never a mode or option choice.
//! - **SilenceAuthorization**: does (silence duration, safety level)
//!   structurally authorize proxy action?
//! - **MinimalInterventionSelector**: deterministic total order over
//!   candidate options, least invasive first.

pub mod ambiguity;
pub mod anchor;
pub mod error;
pub mod selector;
pub mod silence;

pub use ambiguity::{AmbiguitySource, FixedOffset, SeededSource, ThreadRngSource};
pub use anchor::AnchorPolicy;
pub use error::PolicyError;
pub use selector::MinimalInterventionSelector;
pub use silence::SilenceAuthorization;
