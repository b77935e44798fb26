//! Graph record — one independent graph before collation.

use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// Directed edge `(source, target)` between node indices local to a record.
pub type Edge = (usize, usize);

/// Granularity of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelLevel {
    /// One class for the whole graph.
    Graph,
    /// One class per node.
    Node,
}

/// Class label of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Graph(usize),
    Node(Vec<usize>),
}

impl Label {
    pub fn level(&self) -> LabelLevel {
        match self {
            Label::Graph(_) => LabelLevel::Graph,
            Label::Node(_) => LabelLevel::Node,
        }
    }

    /// Label entries as a flat slice (length 1 for graph labels).
    pub fn as_slice(&self) -> &[usize] {
        match self {
            Label::Graph(class) => std::slice::from_ref(class),
            Label::Node(classes) => classes,
        }
    }

    /// Rebuild a label from a flat slice at the given level.
    pub fn from_slice(level: LabelLevel, values: &[usize]) -> Result<Self> {
        match level {
            LabelLevel::Node => Ok(Label::Node(values.to_vec())),
            LabelLevel::Graph => match values {
                [class] => Ok(Label::Graph(*class)),
                _ => Err(Error::MalformedInput(format!(
                    "graph label must have exactly one entry, got {}",
                    values.len()
                ))),
            },
        }
    }
}

/// Per-node train/val/test split masks.
///
/// At most one mask should be set per node. Violations are reported by
/// [`NodeMasks::overlapping`] and treated as a data-quality warning.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeMasks {
    pub train: Vec<bool>,
    pub val: Vec<bool>,
    pub test: Vec<bool>,
}

impl NodeMasks {
    pub fn new(train: Vec<bool>, val: Vec<bool>, test: Vec<bool>) -> Result<Self> {
        if train.len() != val.len() || train.len() != test.len() {
            return Err(Error::MalformedInput(format!(
                "mask lengths differ: train={}, val={}, test={}",
                train.len(), val.len(), test.len()
            )));
        }
        Ok(Self { train, val, test })
    }

    pub fn len(&self) -> usize {
        self.train.len()
    }

    pub fn is_empty(&self) -> bool {
        self.train.is_empty()
    }

    /// Check that all three masks cover exactly `nodes` nodes.
    pub fn check_len(&self, nodes: usize) -> std::result::Result<(), String> {
        for (name, mask) in [("train", &self.train), ("val", &self.val), ("test", &self.test)] {
            if mask.len() != nodes {
                return Err(format!("{name} mask covers {} nodes, expected {nodes}", mask.len()));
            }
        }
        Ok(())
    }

    /// Number of masks set for `node`.
    pub fn assigned(&self, node: usize) -> usize {
        [&self.train, &self.val, &self.test]
            .iter()
            .filter(|mask| mask.get(node).copied().unwrap_or(false))
            .count()
    }

    /// Nodes with more than one mask set.
    pub fn overlapping(&self) -> Vec<usize> {
        (0..self.len()).filter(|&n| self.assigned(n) > 1).collect()
    }

    /// Nodes with no mask set.
    pub fn unassigned(&self) -> Vec<usize> {
        (0..self.len()).filter(|&n| self.assigned(n) == 0).collect()
    }

    pub fn extend_from(&mut self, other: &NodeMasks) {
        self.train.extend_from_slice(&other.train);
        self.val.extend_from_slice(&other.val);
        self.test.extend_from_slice(&other.test);
    }

    /// Copy of the masks for nodes in `range`.
    pub fn slice(&self, range: std::ops::Range<usize>) -> Self {
        Self {
            train: self.train[range.clone()].to_vec(),
            val: self.val[range.clone()].to_vec(),
            test: self.test[range].to_vec(),
        }
    }
}

/// A single graph: node features, sparse edges, label and optional masks.
///
/// The node count is `node_features.len()` and is fixed once the record is
/// created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphRecord {
    pub node_features: Vec<Vec<f32>>,
    pub edge_index: Vec<Edge>,
    pub label: Label,
    pub masks: Option<NodeMasks>,
}

impl GraphRecord {
    pub fn new(node_features: Vec<Vec<f32>>, edge_index: Vec<Edge>, label: Label) -> Self {
        Self { node_features, edge_index, label, masks: None }
    }

    pub fn with_masks(mut self, masks: NodeMasks) -> Self {
        self.masks = Some(masks);
        self
    }

    pub fn num_nodes(&self) -> usize {
        self.node_features.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edge_index.len()
    }

    /// Feature dimension, or 0 for a record without nodes.
    pub fn num_node_features(&self) -> usize {
        self.node_features.first().map(Vec::len).unwrap_or(0)
    }

    /// Out-degree of `node`: the number of edges whose source is `node`.
    pub fn degree(&self, node: usize) -> usize {
        self.edge_index.iter().filter(|(src, _)| *src == node).count()
    }

    /// Check the structural invariants of the record.
    pub fn validate(&self) -> Result<()> {
        let n = self.num_nodes();
        let dim = self.num_node_features();

        if let Some(row) = self.node_features.iter().position(|row| row.len() != dim) {
            return Err(Error::MalformedInput(format!(
                "node {row} has {} features, expected {dim}",
                self.node_features[row].len()
            )));
        }

        if let Some(&(src, dst)) = self.edge_index.iter().find(|(s, d)| *s >= n || *d >= n) {
            return Err(Error::MalformedInput(format!(
                "edge ({src}, {dst}) out of range for {n} nodes"
            )));
        }

        if let Label::Node(classes) = &self.label {
            if classes.len() != n {
                return Err(Error::MalformedInput(format!(
                    "{} node labels for {n} nodes",
                    classes.len()
                )));
            }
        }

        if let Some(masks) = &self.masks {
            masks.check_len(n).map_err(Error::MalformedInput)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> GraphRecord {
        GraphRecord::new(
            vec![vec![1.0]; 3],
            vec![(0, 1), (1, 0), (1, 2), (2, 1), (0, 2), (2, 0)],
            Label::Graph(0),
        )
    }

    #[test]
    fn test_degree() {
        let g = triangle();
        assert_eq!(g.degree(0), 2);
        assert_eq!(g.degree(1), 2);
        assert_eq!(g.degree(3), 0);
    }

    #[test]
    fn test_validate_ok() {
        assert!(triangle().validate().is_ok());
    }

    #[test]
    fn test_validate_edge_out_of_range() {
        let mut g = triangle();
        g.edge_index.push((0, 3));
        assert!(matches!(g.validate(), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_validate_ragged_features() {
        let mut g = triangle();
        g.node_features[2] = vec![1.0, 2.0];
        assert!(g.validate().is_err());
    }

    #[test]
    fn test_validate_node_label_length() {
        let mut g = triangle();
        g.label = Label::Node(vec![0, 1]);
        assert!(g.validate().is_err());
    }

    #[test]
    fn test_label_from_slice() {
        assert_eq!(Label::from_slice(LabelLevel::Graph, &[3]).unwrap(), Label::Graph(3));
        assert_eq!(Label::from_slice(LabelLevel::Node, &[0, 1]).unwrap(), Label::Node(vec![0, 1]));
        assert!(Label::from_slice(LabelLevel::Graph, &[0, 1]).is_err());
    }

    #[test]
    fn test_mask_overlap_and_gaps() {
        let masks = NodeMasks::new(
            vec![true, true, false],
            vec![false, true, false],
            vec![false, false, false],
        ).unwrap();
        assert_eq!(masks.overlapping(), vec![1]);
        assert_eq!(masks.unassigned(), vec![2]);
    }

    #[test]
    fn test_validate_short_test_mask() {
        let masks = NodeMasks {
            train: vec![true, false, false],
            val: vec![false, true, false],
            test: vec![false],
        };
        let g = triangle().with_masks(masks);
        assert!(matches!(g.validate(), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_mask_length_mismatch() {
        assert!(NodeMasks::new(vec![true], vec![], vec![false]).is_err());
    }
}
