//! Persisted flat store.
//!
//! Only the flat record sequence is ever written. The hidden root is stored
//! verbatim as the first record.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::NodeRecord;
use crate::infrastructure::traits::FileSystem;

/// Durable home of a flat node sequence.
pub trait FlatStore: Send + Sync {
    /// Human-readable location, used in error messages.
    fn location(&self) -> PathBuf;

    fn exists(&self) -> bool;

    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> io::Result<Option<Vec<NodeRecord>>>;

    fn save(&self, records: &[NodeRecord]) -> io::Result<()>;
}

/// On-disk layout: an array of `[[nodes]]` tables in flat order.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    nodes: Vec<NodeRecord>,
}

/// TOML file store.
pub struct TomlFileStore {
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl TomlFileStore {
    pub fn new(path: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            path: path.into(),
            fs,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FlatStore for TomlFileStore {
    fn location(&self) -> PathBuf {
        self.path.clone()
    }

    fn exists(&self) -> bool {
        self.fs.is_file(&self.path)
    }

    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> io::Result<Option<Vec<NodeRecord>>> {
        if !self.fs.exists(&self.path) {
            debug!("store does not exist yet");
            return Ok(None);
        }
        let content = self.fs.read_to_string(&self.path)?;
        let doc: StoreDocument = toml::from_str(&content)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        debug!("read {} records", doc.nodes.len());
        Ok(Some(doc.nodes))
    }

    #[instrument(level = "debug", skip(self, records), fields(path = %self.path.display(), len = records.len()))]
    fn save(&self, records: &[NodeRecord]) -> io::Result<()> {
        let doc = StoreDocument {
            nodes: records.to_vec(),
        };
        let content = toml::to_string_pretty(&doc)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        self.fs.write_atomic(&self.path, &content)
    }
}

/// Process-local store, handy for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Option<Vec<NodeRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<NodeRecord>) -> Self {
        Self {
            records: Mutex::new(Some(records)),
        }
    }

    fn poisoned<T>(_: T) -> io::Error {
        io::Error::new(io::ErrorKind::Other, "memory store lock poisoned")
    }
}

impl FlatStore for MemoryStore {
    fn location(&self) -> PathBuf {
        PathBuf::from("<memory>")
    }

    fn exists(&self) -> bool {
        self.records.lock().map(|r| r.is_some()).unwrap_or(false)
    }

    fn load(&self) -> io::Result<Option<Vec<NodeRecord>>> {
        Ok(self.records.lock().map_err(Self::poisoned)?.clone())
    }

    fn save(&self, records: &[NodeRecord]) -> io::Result<()> {
        *self.records.lock().map_err(Self::poisoned)? = Some(records.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::traits::RealFileSystem;
    use tempfile::TempDir;

    #[test]
    fn given_missing_file_when_loading_then_returns_none() {
        let temp = TempDir::new().unwrap();
        let store = TomlFileStore::new(temp.path().join("tree.toml"), Arc::new(RealFileSystem));

        assert!(!store.exists());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn given_records_when_saved_then_written_as_node_tables() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/tree.toml");
        let store = TomlFileStore::new(&path, Arc::new(RealFileSystem));
        let records = NodeRecord::default_tree("Root", &["alpha"]);

        store.save(&records).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[[nodes]]"));
        assert!(content.contains("label = \"alpha\""));
        assert!(!path.with_extension("toml.tmp").exists());
        assert_eq!(store.load().unwrap(), Some(records));
    }

    #[test]
    fn given_garbage_file_when_loading_then_invalid_data() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tree.toml");
        std::fs::write(&path, "nodes = 12").unwrap();
        let store = TomlFileStore::new(&path, Arc::new(RealFileSystem));

        let err = store.load().unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn given_memory_store_when_saved_then_loads_same_records() {
        let store = MemoryStore::new();
        assert!(!store.exists());

        store.save(&[NodeRecord::root("Root")]).unwrap();

        assert!(store.exists());
        assert_eq!(store.load().unwrap(), Some(vec![NodeRecord::root("Root")]));
    }
}
