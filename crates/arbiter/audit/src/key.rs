use std::fmt;

use crate::error::{AuditError, Result};

/// Secret used to key record digests.
///
/// The log never generates or persists the secret; provisioning is the
/// deployment's job.
#[derive(Clone, PartialEq, Eq)]
pub struct AuditKey(Vec<u8>);

impl AuditKey {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(AuditError::InvalidKey("secret must not be empty".into()));
        }
        Ok(Self(bytes))
    }

    /// Interpret a secret as found in configuration or the environment.
    ///
    /// Valid hex is decoded; anything else is taken as raw bytes.
    pub fn from_secret_str(secret: &str) -> Result<Self> {
        let secret = secret.trim();
        match hex::decode(secret) {
            Ok(bytes) if !bytes.is_empty() => Self::new(bytes),
            _ => Self::new(secret.as_bytes()),
        }
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for AuditKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuditKey(<redacted, {} bytes>)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_secret_rejected() {
        assert!(matches!(AuditKey::new(Vec::new()), Err(AuditError::InvalidKey(_))));
        assert!(AuditKey::from_secret_str("   ").is_err());
    }

    #[test]
    fn hex_secret_is_decoded() {
        let key = AuditKey::from_secret_str("00ff10").unwrap();
        assert_eq!(key.as_bytes(), &[0x00, 0xff, 0x10]);
    }

    #[test]
    fn non_hex_secret_is_raw() {
        let key = AuditKey::from_secret_str("correct horse").unwrap();
        assert_eq!(key.as_bytes(), b"correct horse");
    }

    #[test]
    fn debug_never_prints_secret() {
        let key = AuditKey::new(b"hunter2".to_vec()).unwrap();
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("7 bytes"));
    }
}
