//! # Raw Dataset Readers
//!
//! Turn the two known raw layouts into [`GraphRecord`]s.
//!
//! | Kind | Datasets | Output |
//! |------|----------|--------|
//! | `MultiGraph` | `BA_2Motifs` | one record per graph, graph-level label |
//! | `SingleGraph` | `BA_shapes`, `BA_Community`, `Tree_Cycle`, ... | one record, node-level labels + masks |
//!
//! Readers are pure: they validate eagerly and fail with
//! [`Error::MalformedInput`] rather than emit partial records.

pub mod raw;
pub mod hooks;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::*;
use crate::{Error, Result};

pub use hooks::ProcessHooks;
pub use raw::{MultiGraphRaw, SingleGraphRaw};

/// Which raw layout a dataset uses. Resolved once from the dataset name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReaderKind {
    MultiGraph,
    SingleGraph,
}

impl ReaderKind {
    /// `BA_2Motifs` (any case) is multi-graph; every other name is single-graph.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("ba_2motifs") {
            ReaderKind::MultiGraph
        } else {
            ReaderKind::SingleGraph
        }
    }

    /// Parse raw bytes and produce records.
    pub fn read(self, bytes: &[u8]) -> Result<Vec<GraphRecord>> {
        match self {
            ReaderKind::MultiGraph => read_multi_graph(MultiGraphRaw::from_slice(bytes)?),
            ReaderKind::SingleGraph => Ok(vec![read_single_graph(SingleGraphRaw::from_slice(bytes)?)?]),
        }
    }
}

/// Index of the single nonzero entry of a one-hot row.
pub fn one_hot_index(row: &[f64]) -> Result<usize> {
    let mut hot = row.iter().enumerate().filter(|(_, v)| **v != 0.0).map(|(i, _)| i);
    match (hot.next(), hot.next()) {
        (Some(i), None) => Ok(i),
        (None, _) => Err(Error::MalformedInput(format!("one-hot row {row:?} has no class"))),
        (Some(_), Some(_)) => Err(Error::MalformedInput(format!(
            "one-hot row {row:?} has multiple classes"
        ))),
    }
}

/// One record per graph; label is the hot index of that graph's label row.
pub fn read_multi_graph(raw: MultiGraphRaw) -> Result<Vec<GraphRecord>> {
    let n = raw.dense_edges.len();
    if raw.node_features.len() != n || raw.graph_labels.len() != n {
        return Err(Error::MalformedInput(format!(
            "graph counts differ: {} adjacency, {} feature, {} label entries",
            n,
            raw.node_features.len(),
            raw.graph_labels.len()
        )));
    }

    let records = raw
        .dense_edges
        .into_iter()
        .zip(raw.node_features)
        .zip(raw.graph_labels)
        .enumerate()
        .map(|(g, ((dense, features), one_hot))| {
            let adj = AdjacencyMatrix::from_rows(dense)?;
            if adj.dim() != features.len() {
                return Err(Error::MalformedInput(format!(
                    "graph {g}: {}x{0} adjacency for {} feature rows",
                    adj.dim(),
                    features.len()
                )));
            }
            let label = one_hot_index(&one_hot)
                .map_err(|e| Error::MalformedInput(format!("graph {g}: {e}")))?;
            let record = GraphRecord::new(features, adj.to_sparse(), Label::Graph(label));
            record.validate()?;
            Ok(record)
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(graphs = records.len(), "read multi-graph dataset");
    Ok(records)
}

/// One record covering the whole graph, with per-node labels and masks.
///
/// A node's label row is the sum of the split rows whose mask is set for
/// that node; it must be one-hot. A node with no mask set is rejected.
pub fn read_single_graph(raw: SingleGraphRaw) -> Result<GraphRecord> {
    let adj = AdjacencyMatrix::from_rows(raw.adj)?;
    let v = adj.dim();

    for (name, len) in [
        ("features", raw.features.len()),
        ("y_train", raw.y_train.len()),
        ("y_val", raw.y_val.len()),
        ("y_test", raw.y_test.len()),
        ("train_mask", raw.train_mask.len()),
        ("val_mask", raw.val_mask.len()),
        ("test_mask", raw.test_mask.len()),
    ] {
        if len != v {
            return Err(Error::MalformedInput(format!("{name} has {len} rows for {v} nodes")));
        }
    }

    let masks = NodeMasks::new(raw.train_mask, raw.val_mask, raw.test_mask)?;
    let overlapping = masks.overlapping();
    if !overlapping.is_empty() {
        warn!(nodes = ?overlapping, "nodes belong to more than one split");
    }

    let labels = (0..v)
        .map(|node| {
            let selected: Vec<&[f64]> = [
                (&masks.train, &raw.y_train),
                (&masks.val, &raw.y_val),
                (&masks.test, &raw.y_test),
            ]
            .into_iter()
            .filter(|(mask, _)| mask[node])
            .map(|(_, y)| y[node].as_slice())
            .collect();

            if selected.is_empty() {
                return Err(Error::MalformedInput(format!("node {node}: no split mask set")));
            }
            let width = selected.iter().map(|row| row.len()).max().unwrap_or(0);
            let row: Vec<f64> = (0..width)
                .map(|c| selected.iter().map(|r| r.get(c).copied().unwrap_or(0.0)).sum())
                .collect();
            one_hot_index(&row).map_err(|e| Error::MalformedInput(format!("node {node}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    let record = GraphRecord::new(raw.features, adj.to_sparse(), Label::Node(labels)).with_masks(masks);
    record.validate()?;

    debug!(nodes = record.num_nodes(), edges = record.num_edges(), "read single-graph dataset");
    Ok(record)
}
