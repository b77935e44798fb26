//! Filesystem dataset store.
//!
//! Writes go to a sibling temp file that is persisted over the target, so a
//! crash mid-write leaves either the old file or the new one. A failed write
//! removes its temp file.

use std::fs;
use std::io::{ErrorKind, Write};

use tempfile::NamedTempFile;
use std::path::{Path, PathBuf};

use crate::{Error, Result};
use super::DatasetStore;

/// Files under a root directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &Path) -> PathBuf {
        self.root.join(key)
    }
}

impl DatasetStore for FsStore {
    fn exists(&self, key: &Path) -> Result<bool> {
        Ok(self.resolve(key).is_file())
    }

    fn load(&self, key: &Path) -> Result<Vec<u8>> {
        let path = self.resolve(key);
        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::NotFound(path.display().to_string()),
            _ => Error::Io(e),
        })
    }

    fn save(&self, key: &Path, bytes: &[u8]) -> Result<()> {
        let path = self.resolve(key);
        let parent = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent)?;

        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_creates_dirs_and_loads() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        let key = Path::new("BA_shapes/processed/data.json");

        store.save(key, b"{}").unwrap();
        assert!(store.exists(key).unwrap());
        assert_eq!(store.load(key).unwrap(), b"{}");

        let entries: Vec<_> = fs::read_dir(dir.path().join("BA_shapes/processed"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec!["data.json"]);
    }

    #[test]
    fn test_failed_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        fs::create_dir(dir.path().join("k.json")).unwrap();

        assert!(matches!(store.save(Path::new("k.json"), b"{}"), Err(Error::Io(_))));

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec!["k.json"]);
    }

    #[test]
    fn test_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        let key = Path::new("k.json");

        store.save(key, b"old").unwrap();
        store.save(key, b"new").unwrap();
        assert_eq!(store.load(key).unwrap(), b"new");
    }

    #[test]
    fn test_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        assert!(!store.exists(Path::new("missing")).unwrap());
        assert!(matches!(store.load(Path::new("missing")), Err(Error::NotFound(_))));
    }
}
