//! Raw on-disk inputs.
//!
//! Both layouts are JSON. Each may be written either as a positional array
//! (the tuple order below) or as an object with the named fields.

use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// Multi-graph input: `(dense_edges [N,V,V], node_features [N,V,F], graph_labels [N,C])`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiGraphRaw {
    pub dense_edges: Vec<Vec<Vec<f64>>>,
    pub node_features: Vec<Vec<Vec<f32>>>,
    pub graph_labels: Vec<Vec<f64>>,
}

/// Single-graph input with split masks.
///
/// `edge_label_matrix` is carried through parsing but plays no part in
/// label derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleGraphRaw {
    pub adj: Vec<Vec<f64>>,
    pub features: Vec<Vec<f32>>,
    pub y_train: Vec<Vec<f64>>,
    pub y_val: Vec<Vec<f64>>,
    pub y_test: Vec<Vec<f64>>,
    pub train_mask: Vec<bool>,
    pub val_mask: Vec<bool>,
    pub test_mask: Vec<bool>,
    pub edge_label_matrix: Vec<Vec<f64>>,
}

impl MultiGraphRaw {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| Error::MalformedInput(format!("multi-graph raw file: {e}")))
    }
}

impl SingleGraphRaw {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| Error::MalformedInput(format!("single-graph raw file: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_graph_positional() {
        let raw = MultiGraphRaw::from_slice(br#"[[[[0,1],[1,0]]], [[[1.0],[1.0]]], [[0,1]]]"#).unwrap();
        assert_eq!(raw.dense_edges.len(), 1);
        assert_eq!(raw.graph_labels, vec![vec![0.0, 1.0]]);
    }

    #[test]
    fn test_multi_graph_named() {
        let raw = MultiGraphRaw::from_slice(
            br#"{"dense_edges": [], "node_features": [], "graph_labels": []}"#,
        ).unwrap();
        assert!(raw.dense_edges.is_empty());
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(
            SingleGraphRaw::from_slice(b"not json"),
            Err(Error::MalformedInput(_))
        ));
    }
}
