#![deny(unsafe_code)]
//! # arbiter-types
//!
//! Value types shared by the arbitration engine and the decision log.
//!
//! - **Signals**: [`ResonanceSignal`] (human engagement) and [`SafetyIndex`]
//!   (structural safety) snapshots, constructed fresh per evaluation.
//! - **Options**: [`InterventionOption`], a candidate action with its
//!   ethical/impact metrics, validated at construction.
//! - **Context**: [`DecisionContext`], the non-empty, id-unique option set a
//!   single decision is made over.
//! - **Traces**: [`DecisionTrace`], the write-once record every decision emits.
//! - **Parameters**: [`ConsensusParameters`] and its checked form
//!   [`ValidatedParameters`].
//! - **Clock**: the injectable time source used for trace and log stamps.

pub mod clock;
pub mod context;
pub mod error;
pub mod option;
pub mod params;
pub mod signals;
pub mod trace;

pub use clock::{Clock, FixedClock, SystemClock};
pub use context::DecisionContext;
pub use error::{ClockError, TypesError};
pub use option::{InterventionOption, InterventionOptionBuilder, IMPACT_ECOLOGY_YEARS, IMPACT_ECONOMY};
pub use params::{ConsensusParameters, ValidatedParameters};
pub use signals::{ResonanceSignal, SafetyIndex};
pub use trace::{DecisionMode, DecisionTrace, Profile, TraceFields};
