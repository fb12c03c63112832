//! Canonical serialization and keyed digests.
//!
//! Payloads are canonicalized with the JSON Canonicalization Scheme (sorted
//! keys, no whitespace, ECMAScript number formatting) and authenticated with
//! HMAC-SHA256. Digests travel as lowercase hex.

use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{AuditError, Result};
use crate::key::AuditKey;

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex-encoded digest.
pub const DIGEST_HEX_LEN: usize = 64;

pub fn canonical_bytes(payload: &Value) -> Result<Vec<u8>> {
    serde_jcs::to_vec(payload).map_err(|err| AuditError::Serialization(err.to_string()))
}

pub fn compute_digest(key: &AuditKey, canonical: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|err| AuditError::InvalidKey(err.to_string()))?;
    mac.update(canonical);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn is_canonical_hex(digest: &str) -> bool {
    digest.len() == DIGEST_HEX_LEN
        && digest.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Constant-time comparison of two hex digests.
///
/// Only the exact 64-character lowercase form matches; any other spelling of
/// the same bytes is treated as a mismatch.
pub fn digests_match(stored: &str, computed: &str) -> bool {
    if !is_canonical_hex(stored) || !is_canonical_hex(computed) {
        return false;
    }
    let (Ok(expected), Ok(actual)) = (hex::decode(stored), hex::decode(computed)) else {
        return false;
    };
    if expected.len() != actual.len() {
        return false;
    }
    expected.ct_eq(actual.as_slice()).into()
}
