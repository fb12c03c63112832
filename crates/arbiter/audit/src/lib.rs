#![deny(unsafe_code)]
//! # arbiter-audit
//!
//! Tamper-evident storage for decision traces.
//!
//! Each [`DecisionTrace`](arbiter_types::DecisionTrace) is stamped with an
//! append time, serialized canonically (JCS) and stored next to an
//! HMAC-SHA256 digest of those bytes. [`TamperEvidentLog::verify`] recomputes
//! every digest and reports each record that no longer matches.
//!
//! The digest is keyed, so edits by someone without the [`AuditKey`] are
//! detectable. It does not protect against a holder of the key.

pub mod digest;
pub mod error;
pub mod key;
pub mod log;
pub mod record;
pub mod store;

pub use digest::{canonical_bytes, compute_digest, digests_match, DIGEST_HEX_LEN};
pub use error::{AuditError, Result};
pub use key::AuditKey;
pub use log::{FailureReason, IntegrityFailure, TamperEvidentLog, VerificationReport};
pub use record::{AuditPayload, AuditRecord};
pub use store::{FileRecordStore, MemoryRecordStore, RecordStore, StoredEntry};
