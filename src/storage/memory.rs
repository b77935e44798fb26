//! In-memory dataset store.
//!
//! A `HashMap` of keys to byte buffers behind a `RwLock`. Clones share the
//! same map, so a store handed to a pipeline can still be inspected by the
//! caller afterwards.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::{Error, Result};
use super::DatasetStore;

/// In-memory byte store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: Arc<RwLock<HashMap<PathBuf, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }

    /// Drop `key`. Returns true if it existed.
    pub fn remove(&self, key: &Path) -> bool {
        self.files.write().remove(key).is_some()
    }
}

impl DatasetStore for MemoryStore {
    fn exists(&self, key: &Path) -> Result<bool> {
        Ok(self.files.read().contains_key(key))
    }

    fn load(&self, key: &Path) -> Result<Vec<u8>> {
        self.files
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| Error::NotFound(key.display().to_string()))
    }

    fn save(&self, key: &Path, bytes: &[u8]) -> Result<()> {
        self.files.write().insert(key.to_path_buf(), bytes.to_vec());
        Ok(())
    }
}
