//! # Graph Dataset Model
//!
//! Plain data types shared by the readers, the generator, the collator and
//! the cache. This module is pure data: no I/O, no randomness.

pub mod record;
pub mod adjacency;
pub mod collated;

pub use record::{Edge, GraphRecord, Label, LabelLevel, NodeMasks};
pub use adjacency::AdjacencyMatrix;
pub use collated::{CollatedDataset, GraphSlice, GraphStorage, SliceTable};
