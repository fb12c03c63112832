use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// Which policy generation is active for an evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Profile {
    /// Dialogue-first: defer to humans while they are engaged.
    #[serde(rename = "v4")]
    V4,
    /// Governance: may act by proxy under sustained silence and critical safety.
    #[serde(rename = "v5")]
    V5,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::V4 => "v4",
            Profile::V5 => "v5",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v4" => Ok(Profile::V4),
            "v5" => Ok(Profile::V5),
            _ => Err(TypesError::InvalidProfile(s.to_string())),
        }
    }
}

/// The three terminal outcomes of an arbitration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionMode {
    /// Defer to human consultation.
    Consult,
    /// Act autonomously on humanity's behalf under minimal intervention.
    Proxy,
    /// Take no action.
    Halt,
}

impl fmt::Display for DecisionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionMode::Consult => write!(f, "CONSULT"),
            DecisionMode::Proxy => write!(f, "PROXY"),
            DecisionMode::Halt => write!(f, "HALT"),
        }
    }
}

/// Descriptive fields shared by every trace, whatever its mode.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TraceFields {
    pub decision_id: String,
    pub timestamp: String,
    pub tags: Vec<String>,
    pub notes: String,
    pub lineage_refs: Vec<String>,
    pub parameters: BTreeMap<String, f64>,
}

/// The write-once record of a single decision.
///
/// Fields are private and there are no setters. Construction goes through
/// [`consult`](Self::consult), [`proxy`](Self::proxy) or [`halt`](Self::halt),
/// so `selected_option` is present exactly when `mode` is
/// [`DecisionMode::Proxy`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DecisionTrace {
    decision_id: String,
    mode: DecisionMode,
    selected_option: Option<String>,
    timestamp: String,
    tags: Vec<String>,
    notes: String,
    lineage_refs: Vec<String>,
    parameters: BTreeMap<String, f64>,
}

impl DecisionTrace {
    fn from_fields(mode: DecisionMode, selected_option: Option<String>, fields: TraceFields) -> Self {
        Self {
            decision_id: fields.decision_id,
            mode,
            selected_option,
            timestamp: fields.timestamp,
            tags: fields.tags,
            notes: fields.notes,
            lineage_refs: fields.lineage_refs,
            parameters: fields.parameters,
        }
    }

    pub fn consult(fields: TraceFields) -> Self {
        Self::from_fields(DecisionMode::Consult, None, fields)
    }

    pub fn proxy(selected_option: impl Into<String>, fields: TraceFields) -> Self {
        Self::from_fields(DecisionMode::Proxy, Some(selected_option.into()), fields)
    }

    pub fn halt(fields: TraceFields) -> Self {
        Self::from_fields(DecisionMode::Halt, None, fields)
    }

    pub fn decision_id(&self) -> &str {
        &self.decision_id
    }

    pub fn mode(&self) -> DecisionMode {
        self.mode
    }

    pub fn selected_option(&self) -> Option<&str> {
        self.selected_option.as_deref()
    }

    /// RFC 3339 UTC timestamp of the evaluation.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn lineage_refs(&self) -> &[String] {
        &self.lineage_refs
    }

    /// Exact threshold/weight values the decision was made with.
    pub fn parameters(&self) -> &BTreeMap<String, f64> {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.parameters.get(name).copied()
    }
}
