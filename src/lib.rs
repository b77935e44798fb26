//! # syngraph — Benchmark Graph Datasets for GNN Explainability
//!
//! Loads the small synthetic benchmarks used to evaluate GNN explainers
//! (BA-2Motifs, BA-shapes, Tree-Cycle, ...) and generates the BA-LRP
//! two-class dataset.
//!
//! ## Pipeline
//!
//! 1. **Read**: raw dense adjacency + features + one-hot labels → `GraphRecord`s
//! 2. **Generate**: BA-LRP graphs grown by (inverse) preferential attachment
//! 3. **Collate**: records → one `CollatedDataset` with an O(1) slice table
//! 4. **Cache**: the collated bundle is persisted through a `DatasetStore`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use syngraph::{BaLrpConfig, Datasets, ProcessHooks};
//!
//! # fn example() -> syngraph::Result<()> {
//! let datasets = Datasets::open_dir("datasets");
//! let config = BaLrpConfig { num_per_class: 100, seed: Some(0), ..Default::default() };
//! let ba_lrp = datasets.ba_lrp(&config, &ProcessHooks::new())?;
//!
//! for graph in ba_lrp.iter() {
//!     let graph = graph?;
//!     println!("{} nodes, {} edges, {:?}", graph.num_nodes(), graph.num_edges(), graph.label);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Stores
//!
//! | Store | Description |
//! |-------|-------------|
//! | `MemoryStore` | In-memory, for testing/embedding |
//! | `FsStore` | Files under a root directory |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod reader;
pub mod collate;
pub mod generate;
pub mod storage;
pub mod download;
pub mod dataset;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    AdjacencyMatrix, CollatedDataset, Edge, GraphRecord, GraphSlice,
    GraphStorage, Label, LabelLevel, NodeMasks, SliceTable,
};

// ============================================================================
// Re-exports: Pipeline
// ============================================================================

pub use collate::collate;
pub use reader::{ProcessHooks, ReaderKind, MultiGraphRaw, SingleGraphRaw};
pub use generate::{Attachment, BaLrpConfig, BaLrpGenerator, BA_LRP_URL};
pub use storage::{DatasetStore, FsStore, MemoryStore};
pub use download::Fetcher;
pub use dataset::{Datasets, InMemoryDataset, SynGraphConfig, BA_LRP_NAME};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Download of {url} failed: {message}")]
    Download { url: String, message: String },

    #[error("Corrupt cache at {path}: {message}")]
    CacheCorruption { path: String, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Sampling error: {0}")]
    Sampling(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
