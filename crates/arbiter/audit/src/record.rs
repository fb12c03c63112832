//! Stored record shapes.

use std::collections::BTreeMap;

use arbiter_types::{DecisionMode, DecisionTrace};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AuditError, Result};

/// One entry of the log: a payload and the keyed digest of its canonical form.
///
/// The payload is kept as a JSON value, not a typed struct, so verification
/// digests exactly what was stored. Fields added to or removed from a stored
/// payload therefore break its digest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub payload: Value,
    pub digest: String,
}

impl AuditRecord {
    /// The `decision_id` of the payload, if it has a readable one.
    pub fn decision_id(&self) -> Option<&str> {
        self.payload.get("decision_id").and_then(Value::as_str)
    }

    /// Typed view of the payload.
    pub fn decode_payload(&self) -> Result<AuditPayload> {
        Ok(AuditPayload::deserialize(&self.payload)?)
    }
}

/// Every [`DecisionTrace`] field plus `ts`, the append time in float seconds
/// since the Unix epoch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditPayload {
    pub decision_id: String,
    pub mode: DecisionMode,
    pub selected_option: Option<String>,
    pub timestamp: String,
    pub tags: Vec<String>,
    pub notes: String,
    pub lineage_refs: Vec<String>,
    pub parameters: BTreeMap<String, f64>,
    pub ts: f64,
}

impl AuditPayload {
    pub fn from_trace(trace: &DecisionTrace, ts: f64) -> Self {
        Self {
            decision_id: trace.decision_id().to_string(),
            mode: trace.mode(),
            selected_option: trace.selected_option().map(str::to_string),
            timestamp: trace.timestamp().to_string(),
            tags: trace.tags().to_vec(),
            notes: trace.notes().to_string(),
            lineage_refs: trace.lineage_refs().to_vec(),
            parameters: trace.parameters().clone(),
            ts,
        }
    }

    /// JSON form of the payload.
    ///
    /// JSON has no encoding for NaN or infinities, so any non-finite number
    /// fails here instead of being silently written as `null`.
    pub fn to_value(&self) -> Result<Value> {
        if !self.ts.is_finite() {
            return Err(AuditError::Serialization(format!(
                "ts is not finite: {}",
                self.ts
            )));
        }
        if let Some((name, value)) = self.parameters.iter().find(|(_, v)| !v.is_finite()) {
            return Err(AuditError::Serialization(format!(
                "parameter {name} is not finite: {value}"
            )));
        }
        serde_json::to_value(self).map_err(|err| AuditError::Serialization(err.to_string()))
    }
}
