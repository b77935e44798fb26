//! # Dataset Store Trait
//!
//! The contract between the dataset pipeline and wherever bytes live.
//! Keys are relative paths such as `BA_2Motifs/raw/BA_2Motifs.json`.
//!
//! ## Implementations
//!
//! | Store | Module | Description |
//! |-------|--------|-------------|
//! | `MemoryStore` | `memory` | In-memory for testing/embedding |
//! | `FsStore` | `fs` | Files under a root directory, atomic writes |

pub mod memory;
pub mod fs;
pub mod bundle;

use std::path::{Path, PathBuf};

use crate::Result;

pub use memory::MemoryStore;
pub use fs::FsStore;
pub use bundle::{BundleHeader, BUNDLE_FORMAT, BUNDLE_VERSION};

/// Byte-level persistence used for raw inputs and processed bundles.
pub trait DatasetStore {
    /// Whether `key` holds data.
    fn exists(&self, key: &Path) -> Result<bool>;

    /// Read the full contents of `key`. Fails with `Error::NotFound` if absent.
    fn load(&self, key: &Path) -> Result<Vec<u8>>;

    /// Replace the contents of `key`. Readers never observe a partial write.
    fn save(&self, key: &Path, bytes: &[u8]) -> Result<()>;
}

/// `<name>/raw/<file>`
pub fn raw_key(name: &str, file: &str) -> PathBuf {
    Path::new(name).join("raw").join(file)
}

/// `<name>/processed/data.json`
pub fn processed_key(name: &str) -> PathBuf {
    Path::new(name).join("processed").join("data.json")
}
