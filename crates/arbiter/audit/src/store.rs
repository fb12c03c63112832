//! Record stores backing the audit log

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::error;

use crate::error::Result;
use crate::record::AuditRecord;

/// A line read back from a store.
#[derive(Clone, Debug, PartialEq)]
pub enum StoredEntry {
    /// The line is well-formed JSON.
    Parsed(Value),
    /// The line could not be read as JSON.
    Unparseable { raw: String, error: String },
}

impl StoredEntry {
    fn parse(line: &[u8]) -> Self {
        match serde_json::from_slice(line) {
            Ok(value) => StoredEntry::Parsed(value),
            Err(err) => StoredEntry::Unparseable {
                raw: String::from_utf8_lossy(line).into_owned(),
                error: err.to_string(),
            },
        }
    }

    /// The entry as an [`AuditRecord`], if it has that shape.
    pub fn record(&self) -> Option<AuditRecord> {
        match self {
            StoredEntry::Parsed(value) => serde_json::from_value(value.clone()).ok(),
            StoredEntry::Unparseable { .. } => None,
        }
    }
}

fn parse_lines(contents: &[u8]) -> Vec<StoredEntry> {
    contents
        .split(|b| *b == b'\n')
        .filter(|line| !line.trim_ascii().is_empty())
        .map(StoredEntry::parse)
        .collect()
}

/// Durable sequential storage for audit records.
///
/// Appends must be all-or-nothing: a failed append leaves the store exactly
/// as it was, and no reader ever observes a partial record.
pub trait RecordStore: Send + Sync {
    /// Every stored entry, oldest first.
    fn read_all(&self) -> Result<Vec<StoredEntry>>;

    fn append(&self, record: &AuditRecord) -> Result<()>;

    fn len(&self) -> Result<usize> {
        Ok(self.read_all()?.len())
    }
}

/// In-memory store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    pub(crate) lines: RwLock<Vec<String>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the stored lines.
    pub fn lines(&self) -> Vec<String> {
        self.lines.read().clone()
    }
}

impl RecordStore for MemoryRecordStore {
    fn read_all(&self) -> Result<Vec<StoredEntry>> {
        Ok(self
            .lines
            .read()
            .iter()
            .map(|line| StoredEntry::parse(line.as_bytes()))
            .collect())
    }

    fn append(&self, record: &AuditRecord) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.lines.write().push(line);
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.lines.read().len())
    }
}

/// JSON Lines file store, one `{"payload":…,"digest":…}` object per line.
///
/// Writers hold an exclusive advisory lock for the duration of an append and
/// readers hold a shared one, so other processes using this store never see a
/// half-written line.
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    path: PathBuf,
}

impl FileRecordStore {
    /// Open the store at `path`, creating it and its parent directories when
    /// missing. An existing file is never truncated.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append_locked(&self, file: &mut File, mut line: Vec<u8>) -> Result<()> {
        let original_len = file.metadata()?.len();
        if original_len > 0 && !ends_with_newline(file, original_len)? {
            line.insert(0, b'\n');
        }

        if let Err(err) = file.write_all(&line).and_then(|()| file.sync_data()) {
            error!(
                path = %self.path.display(),
                error = %err,
                "audit append failed, rolling back"
            );
            file.set_len(original_len)?;
            return Err(err.into());
        }
        Ok(())
    }
}

fn ends_with_newline(file: &mut File, len: u64) -> std::io::Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

impl RecordStore for FileRecordStore {
    fn read_all(&self) -> Result<Vec<StoredEntry>> {
        let mut file = File::open(&self.path)?;
        FileExt::lock_shared(&file)?;
        let mut contents = Vec::new();
        let read = file.read_to_end(&mut contents);
        FileExt::unlock(&file)?;
        read?;
        Ok(parse_lines(&contents))
    }

    fn append(&self, record: &AuditRecord) -> Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = OpenOptions::new().read(true).append(true).open(&self.path)?;
        FileExt::lock_exclusive(&file)?;
        let result = self.append_locked(&mut file, line);
        let unlocked = FileExt::unlock(&file);
        result?;
        unlocked?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(id: &str) -> AuditRecord {
        AuditRecord {
            payload: json!({"decision_id": id, "ts": 1.0}),
            digest: "ab".repeat(32),
        }
    }

    #[test]
    fn memory_store_appends_in_order() {
        let store = MemoryRecordStore::new();
        store.append(&record("a")).unwrap();
        store.append(&record("b")).unwrap();

        let ids: Vec<_> = store
            .read_all()
            .unwrap()
            .iter()
            .map(|e| e.record().unwrap().decision_id().unwrap().to_string())
            .collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn file_store_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/decisions.jsonl");
        let store = FileRecordStore::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn file_store_reopen_keeps_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");

        FileRecordStore::open(&path).unwrap().append(&record("a")).unwrap();
        let reopened = FileRecordStore::open(&path).unwrap();
        assert_eq!(reopened.len().unwrap(), 1);
        reopened.append(&record("b")).unwrap();
        assert_eq!(reopened.len().unwrap(), 2);
    }

    #[test]
    fn append_after_unterminated_line_starts_a_new_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");
        let first = serde_json::to_string(&record("a")).unwrap();
        fs::write(&path, &first).unwrap();

        let store = FileRecordStore::open(&path).unwrap();
        store.append(&record("b")).unwrap();

        let entries = store.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.record().is_some()));
    }

    #[test]
    fn garbage_lines_are_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");
        fs::write(&path, b"{not json\n\n\xff\xfe\n").unwrap();

        let entries = FileRecordStore::open(&path).unwrap().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries
            .iter()
            .all(|e| matches!(e, StoredEntry::Unparseable { .. })));
    }
}
