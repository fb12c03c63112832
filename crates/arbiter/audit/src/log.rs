use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use arbiter_types::{Clock, DecisionTrace, SystemClock};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::digest::{canonical_bytes, compute_digest, digests_match};
use crate::error::Result;
use crate::key::AuditKey;
use crate::record::{AuditPayload, AuditRecord};
use crate::store::{FileRecordStore, RecordStore, StoredEntry};

/// Why a stored record failed verification.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    /// The recomputed digest differs from the stored one.
    DigestMismatch,
    /// The entry is not a readable `{payload, digest}` record.
    MalformedRecord(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::DigestMismatch => write!(f, "digest mismatch"),
            FailureReason::MalformedRecord(detail) => write!(f, "malformed record: {detail}"),
        }
    }
}

/// A record that failed verification.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IntegrityFailure {
    /// Zero-based position in the log.
    pub position: usize,
    pub decision_id: Option<String>,
    pub reason: FailureReason,
}

/// Result of verifying a whole log
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct VerificationReport {
    /// Total number of records checked
    pub total_records: usize,

    /// Number of records whose digest matched
    pub verified_records: usize,

    /// Every failed record, in log order
    pub failures: Vec<IntegrityFailure>,
}

impl VerificationReport {
    pub fn is_intact(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn first_failure(&self) -> Option<&IntegrityFailure> {
        self.failures.first()
    }
}

/// Append-only decision log with keyed, per-record digests.
///
/// Each appended trace is stamped with the append time, canonicalized, and
/// stored alongside `HMAC-SHA256(key, canonical_bytes)`. Anyone without the
/// key who edits a stored payload cannot produce a matching digest.
pub struct TamperEvidentLog<S: RecordStore> {
    store: S,
    key: AuditKey,
    clock: Arc<dyn Clock>,
    append_lock: Mutex<()>,
}

impl TamperEvidentLog<FileRecordStore> {
    /// Open a file-backed log, creating the file if it does not exist.
    pub fn open(path: impl Into<PathBuf>, key: AuditKey) -> Result<Self> {
        Ok(Self::new(FileRecordStore::open(path)?, key))
    }
}

impl<S: RecordStore> TamperEvidentLog<S> {
    pub fn new(store: S, key: AuditKey) -> Self {
        Self::with_clock(store, key, Arc::new(SystemClock))
    }

    pub fn with_clock(store: S, key: AuditKey, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            key,
            clock,
            append_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stamp, digest and append one trace.
    ///
    /// On failure nothing is written.
    pub fn append(&self, trace: &DecisionTrace) -> Result<AuditRecord> {
        let _guard = self.append_lock.lock();

        let ts = self.clock.epoch_seconds()?;
        let payload = AuditPayload::from_trace(trace, ts).to_value()?;
        let digest = compute_digest(&self.key, &canonical_bytes(&payload)?)?;
        let record = AuditRecord { payload, digest };

        if let Err(err) = self.store.append(&record) {
            error!(decision_id = trace.decision_id(), error = %err, "audit append failed");
            return Err(err);
        }

        info!(
            decision_id = trace.decision_id(),
            digest = &record.digest[..12],
            "decision appended to audit log"
        );
        Ok(record)
    }

    /// Recompute every stored digest.
    ///
    /// The whole log is scanned so every tampered position is reported. Store
    /// I/O failures are errors; tampering is reported in the returned value.
    pub fn verify(&self) -> Result<VerificationReport> {
        let entries = {
            let _guard = self.append_lock.lock();
            self.store.read_all()?
        };

        let mut report = VerificationReport {
            total_records: entries.len(),
            ..Default::default()
        };
        for (position, entry) in entries.into_iter().enumerate() {
            match self.check_entry(position, entry)? {
                None => report.verified_records += 1,
                Some(failure) => report.failures.push(failure),
            }
        }

        if let Some(first) = report.first_failure() {
            warn!(
                position = first.position,
                decision_id = first.decision_id.as_deref().unwrap_or("-"),
                reason = %first.reason,
                failures = report.failures.len(),
                "audit log integrity check failed"
            );
        }
        Ok(report)
    }

    /// `true` iff every stored record verifies. A store that cannot be read
    /// is not considered intact.
    pub fn is_intact(&self) -> bool {
        match self.verify() {
            Ok(report) => report.is_intact(),
            Err(err) => {
                error!(error = %err, "audit log could not be read for verification");
                false
            }
        }
    }

    /// Every stored entry, oldest first, readable or not.
    pub fn entries(&self) -> Result<Vec<StoredEntry>> {
        self.store.read_all()
    }

    /// The well-formed records, oldest first.
    pub fn records(&self) -> Result<Vec<AuditRecord>> {
        Ok(self
            .store
            .read_all()?
            .iter()
            .filter_map(StoredEntry::record)
            .collect())
    }

    pub fn len(&self) -> Result<usize> {
        self.store.len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn check_entry(&self, position: usize, entry: StoredEntry) -> Result<Option<IntegrityFailure>> {
        let failure = |decision_id: Option<String>, reason| {
            Some(IntegrityFailure {
                position,
                decision_id,
                reason,
            })
        };

        let value = match entry {
            StoredEntry::Parsed(value) => value,
            StoredEntry::Unparseable { error, .. } => {
                return Ok(failure(None, FailureReason::MalformedRecord(error)));
            }
        };
        let decision_id = value
            .pointer("/payload/decision_id")
            .and_then(Value::as_str)
            .map(str::to_string);

        let record: AuditRecord = match serde_json::from_value(value) {
            Ok(record) => record,
            Err(err) => {
                return Ok(failure(
                    decision_id,
                    FailureReason::MalformedRecord(err.to_string()),
                ));
            }
        };
        let canonical = match canonical_bytes(&record.payload) {
            Ok(bytes) => bytes,
            Err(err) => {
                return Ok(failure(
                    decision_id,
                    FailureReason::MalformedRecord(err.to_string()),
                ));
            }
        };

        let computed = compute_digest(&self.key, &canonical)?;
        if digests_match(&record.digest, &computed) {
            Ok(None)
        } else {
            Ok(failure(decision_id, FailureReason::DigestMismatch))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use arbiter_types::{FixedClock, TraceFields};
    use serde_json::json;

    use super::*;
    use crate::store::MemoryRecordStore;

    fn key() -> AuditKey {
        AuditKey::new(b"test-secret".to_vec()).unwrap()
    }

    fn log() -> TamperEvidentLog<MemoryRecordStore> {
        TamperEvidentLog::with_clock(
            MemoryRecordStore::new(),
            key(),
            Arc::new(FixedClock::at_epoch_seconds(1_760_832_000).unwrap()),
        )
    }

    fn trace(id: &str) -> DecisionTrace {
        DecisionTrace::halt(TraceFields {
            decision_id: id.into(),
            timestamp: "2025-10-19T00:00:00.000000Z".into(),
            tags: vec!["SafetyHold".into(), "Inconclusive".into()],
            notes: "halting".into(),
            lineage_refs: vec![],
            parameters: BTreeMap::from([("anchor_weight".to_string(), 0.01)]),
        })
    }

    fn tamper(log: &TamperEvidentLog<MemoryRecordStore>, position: usize, edit: impl Fn(&mut Value)) {
        let mut lines = log.store().lines.write();
        let mut value: Value = serde_json::from_str(&lines[position]).unwrap();
        edit(&mut value);
        lines[position] = value.to_string();
    }

    #[test]
    fn empty_log_is_intact() {
        let log = log();
        let report = log.verify().unwrap();
        assert!(report.is_intact());
        assert_eq!(report.total_records, 0);
        assert!(log.is_intact());
        assert!(log.is_empty().unwrap());
    }

    #[test]
    fn appended_records_verify() {
        let log = log();
        for id in ["d-1", "d-2", "d-3"] {
            log.append(&trace(id)).unwrap();
        }
        let report = log.verify().unwrap();
        assert!(report.is_intact());
        assert_eq!(report.total_records, 3);
        assert_eq!(report.verified_records, 3);
    }

    #[test]
    fn append_stamps_ts_from_clock() {
        let record = log().append(&trace("d-1")).unwrap();
        assert_eq!(record.payload["ts"], 1_760_832_000.0);
        assert_eq!(record.digest.len(), 64);
    }

    #[test]
    fn edited_field_is_detected() {
        let log = log();
        log.append(&trace("d-1")).unwrap();
        log.append(&trace("d-2")).unwrap();
        tamper(&log, 1, |v| v["payload"]["mode"] = json!("proxy"));

        let report = log.verify().unwrap();
        assert!(!report.is_intact());
        assert_eq!(report.verified_records, 1);
        let failure = report.first_failure().unwrap();
        assert_eq!(failure.position, 1);
        assert_eq!(failure.decision_id.as_deref(), Some("d-2"));
        assert_eq!(failure.reason, FailureReason::DigestMismatch);
    }

    #[test]
    fn respelled_digest_is_detected() {
        let log = log();
        log.append(&trace("d-1")).unwrap();
        tamper(&log, 0, |v| {
            let upper = v["digest"].as_str().unwrap().to_uppercase();
            v["digest"] = json!(upper);
        });

        let report = log.verify().unwrap();
        assert_eq!(report.verified_records, 0);
        let failure = report.first_failure().unwrap();
        assert_eq!(failure.decision_id.as_deref(), Some("d-1"));
        assert_eq!(failure.reason, FailureReason::DigestMismatch);
    }

    #[test]
    fn added_and_removed_fields_are_detected() {
        let log = log();
        log.append(&trace("d-1")).unwrap();
        log.append(&trace("d-2")).unwrap();
        tamper(&log, 0, |v| v["payload"]["extra"] = json!(true));
        tamper(&log, 1, |v| {
            v["payload"].as_object_mut().unwrap().remove("notes");
        });

        let report = log.verify().unwrap();
        let positions: Vec<_> = report.failures.iter().map(|f| f.position).collect();
        assert_eq!(positions, [0, 1]);
    }

    #[test]
    fn appends_still_succeed_after_tampering() {
        let log = log();
        log.append(&trace("d-1")).unwrap();
        tamper(&log, 0, |v| v["digest"] = json!("00".repeat(32)));
        log.append(&trace("d-2")).unwrap();

        let report = log.verify().unwrap();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.verified_records, 1);
    }

    #[test]
    fn malformed_entries_are_failures() {
        let log = log();
        log.append(&trace("d-1")).unwrap();
        log.store().lines.write().push("{\"payload\": {}}".into());
        log.store().lines.write().push("not json".into());

        let report = log.verify().unwrap();
        assert_eq!(report.total_records, 3);
        assert_eq!(report.failures.len(), 2);
        assert!(report
            .failures
            .iter()
            .all(|f| matches!(f.reason, FailureReason::MalformedRecord(_))));
    }

    #[test]
    fn wrong_key_fails_every_record() {
        let store = MemoryRecordStore::new();
        let writer = TamperEvidentLog::new(store, key());
        writer.append(&trace("d-1")).unwrap();

        let lines = writer.store().lines();
        let reader_store = MemoryRecordStore::new();
        *reader_store.lines.write() = lines;
        let reader = TamperEvidentLog::new(
            reader_store,
            AuditKey::new(b"other-secret".to_vec()).unwrap(),
        );
        assert!(!reader.is_intact());
    }

    #[test]
    fn non_finite_parameter_is_rejected_without_write() {
        let log = log();
        let bad = DecisionTrace::halt(TraceFields {
            decision_id: "d-nan".into(),
            parameters: BTreeMap::from([("anchor_weight".to_string(), f64::NAN)]),
            ..TraceFields::default()
        });
        assert!(log.append(&bad).is_err());
        assert_eq!(log.len().unwrap(), 0);
    }

    #[test]
    fn report_serializes_reason_kind() {
        let report = VerificationReport {
            total_records: 1,
            verified_records: 0,
            failures: vec![IntegrityFailure {
                position: 0,
                decision_id: Some("d".into()),
                reason: FailureReason::DigestMismatch,
            }],
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["failures"][0]["reason"]["kind"], "digest_mismatch");
    }
}
