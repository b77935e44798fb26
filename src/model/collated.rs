//! Collated dataset — many graphs packed into flat arrays plus a slice table.

use std::ops::Range;
use serde::{Deserialize, Serialize};
use super::{Edge, LabelLevel, NodeMasks};
use crate::{Error, Result};

/// Concatenated arrays of every graph in a dataset.
///
/// Edge endpoints are global: the endpoints of graph `k` are shifted by the
/// node count of graphs `0..k`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphStorage {
    pub node_features: Vec<Vec<f32>>,
    pub edge_index: Vec<Edge>,
    pub labels: Vec<usize>,
    pub masks: Option<NodeMasks>,
    /// `None` only when the dataset holds no graphs.
    pub label_level: Option<LabelLevel>,
}

/// Ranges of one graph inside [`GraphStorage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSlice {
    pub nodes: Range<usize>,
    pub edges: Range<usize>,
    pub labels: Range<usize>,
}

/// Graph index → ranges. Ranges are contiguous and in graph order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SliceTable {
    slices: Vec<GraphSlice>,
}

impl SliceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, slice: GraphSlice) {
        self.slices.push(slice);
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&GraphSlice> {
        self.slices.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GraphSlice> {
        self.slices.iter()
    }

    /// Check that the table partitions `storage` exactly.
    ///
    /// Every range starts where the previous one ended, the last range ends
    /// at the array length, and each graph's edges stay inside its own node
    /// range.
    pub fn validate(&self, storage: &GraphStorage) -> std::result::Result<(), String> {
        let (mut nodes, mut edges, mut labels) = (0, 0, 0);

        for (k, slice) in self.slices.iter().enumerate() {
            for (name, range, cursor) in [
                ("node", &slice.nodes, nodes),
                ("edge", &slice.edges, edges),
                ("label", &slice.labels, labels),
            ] {
                if range.start != cursor || range.end < range.start {
                    return Err(format!(
                        "graph {k}: {name} range {range:?} does not continue at {cursor}"
                    ));
                }
            }

            let expected_labels = match storage.label_level {
                Some(LabelLevel::Graph) => 1,
                Some(LabelLevel::Node) => slice.nodes.len(),
                None => return Err(format!("graph {k}: label level missing")),
            };
            if slice.labels.len() != expected_labels {
                return Err(format!(
                    "graph {k}: {} labels, expected {expected_labels}",
                    slice.labels.len()
                ));
            }

            let Some(graph_edges) = storage.edge_index.get(slice.edges.clone()) else {
                return Err(format!("graph {k}: edge range {:?} out of bounds", slice.edges));
            };
            if let Some((src, dst)) = graph_edges
                .iter()
                .find(|(s, d)| !slice.nodes.contains(s) || !slice.nodes.contains(d))
            {
                return Err(format!(
                    "graph {k}: edge ({src}, {dst}) outside node range {:?}",
                    slice.nodes
                ));
            }

            nodes = slice.nodes.end;
            edges = slice.edges.end;
            labels = slice.labels.end;
        }

        if nodes != storage.node_features.len()
            || edges != storage.edge_index.len()
            || labels != storage.labels.len()
        {
            return Err(format!(
                "slices cover ({nodes}, {edges}, {labels}) entries, storage holds ({}, {}, {})",
                storage.node_features.len(),
                storage.edge_index.len(),
                storage.labels.len()
            ));
        }

        if let Some(masks) = &storage.masks {
            masks.check_len(storage.node_features.len())?;
        }

        Ok(())
    }
}

/// All graphs of a dataset in one storage object plus its slice table.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CollatedDataset {
    storage: GraphStorage,
    slices: SliceTable,
}

impl CollatedDataset {
    /// Assemble from parts, checking that the slices partition the storage.
    pub fn from_parts(storage: GraphStorage, slices: SliceTable) -> Result<Self> {
        slices.validate(&storage).map_err(Error::MalformedInput)?;
        Ok(Self { storage, slices })
    }

    pub fn storage(&self) -> &GraphStorage {
        &self.storage
    }

    pub fn slices(&self) -> &SliceTable {
        &self.slices
    }

    pub fn into_parts(self) -> (GraphStorage, SliceTable) {
        (self.storage, self.slices)
    }

    /// Number of graphs.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn num_node_features(&self) -> usize {
        self.storage.node_features.first().map(Vec::len).unwrap_or(0)
    }

    /// Number of distinct classes, taken as `max(label) + 1`.
    pub fn num_classes(&self) -> usize {
        self.storage.labels.iter().max().map(|m| m + 1).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_graphs() -> (GraphStorage, SliceTable) {
        let storage = GraphStorage {
            node_features: vec![vec![1.0]; 5],
            edge_index: vec![(0, 1), (1, 0), (2, 3), (3, 4)],
            labels: vec![0, 1],
            masks: None,
            label_level: Some(LabelLevel::Graph),
        };
        let mut slices = SliceTable::new();
        slices.push(GraphSlice { nodes: 0..2, edges: 0..2, labels: 0..1 });
        slices.push(GraphSlice { nodes: 2..5, edges: 2..4, labels: 1..2 });
        (storage, slices)
    }

    #[test]
    fn test_from_parts_valid() {
        let (storage, slices) = two_graphs();
        let data = CollatedDataset::from_parts(storage, slices).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.num_classes(), 2);
        assert_eq!(data.num_node_features(), 1);
    }

    #[test]
    fn test_gap_rejected() {
        let (storage, _) = two_graphs();
        let mut slices = SliceTable::new();
        slices.push(GraphSlice { nodes: 0..2, edges: 0..2, labels: 0..1 });
        slices.push(GraphSlice { nodes: 3..5, edges: 2..4, labels: 1..2 });
        assert!(CollatedDataset::from_parts(storage, slices).is_err());
    }

    #[test]
    fn test_uncovered_tail_rejected() {
        let (mut storage, slices) = two_graphs();
        storage.node_features.push(vec![1.0]);
        assert!(slices.validate(&storage).is_err());
    }

    #[test]
    fn test_cross_graph_edge_rejected() {
        let (mut storage, slices) = two_graphs();
        storage.edge_index[1] = (1, 2);
        assert!(slices.validate(&storage).is_err());
    }

    #[test]
    fn test_empty_is_valid() {
        let data = CollatedDataset::from_parts(GraphStorage::default(), SliceTable::new()).unwrap();
        assert!(data.is_empty());
        assert_eq!(data.num_classes(), 0);
    }
}
