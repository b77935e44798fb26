//! Graph collation — merge independent records into one [`CollatedDataset`].
//!
//! ```text
//! [GraphRecord, GraphRecord, ...] → collate() → GraphStorage + SliceTable
//!                                      get(k) ← slice k, endpoints shifted back
//! ```

use tracing::debug;

use crate::model::*;
use crate::{Error, Result};

/// Merge `records` into one dataset, in input order.
///
/// Node features, edges and labels are concatenated. The edge endpoints of
/// record `k` are shifted by the total node count of records `0..k`. Every
/// record is validated first; records must agree on feature dimension, label
/// level and whether masks are present.
///
/// An empty input yields an empty dataset.
pub fn collate(records: Vec<GraphRecord>) -> Result<CollatedDataset> {
    let Some(first) = records.first() else {
        return Ok(CollatedDataset::default());
    };

    let level = first.label.level();
    let dim = records
        .iter()
        .find(|r| r.num_nodes() > 0)
        .map(GraphRecord::num_node_features)
        .unwrap_or(0);
    let with_masks = first.masks.is_some();

    let mut storage = GraphStorage {
        node_features: Vec::new(),
        edge_index: Vec::new(),
        labels: Vec::new(),
        masks: with_masks.then(NodeMasks::default),
        label_level: Some(level),
    };
    let mut slices = SliceTable::new();

    for (k, record) in records.into_iter().enumerate() {
        record.validate().map_err(|e| match e {
            Error::MalformedInput(msg) => Error::MalformedInput(format!("graph {k}: {msg}")),
            other => other,
        })?;

        if record.label.level() != level {
            return Err(Error::MalformedInput(format!(
                "graph {k}: {:?} label, dataset uses {level:?} labels",
                record.label.level()
            )));
        }
        if record.num_nodes() > 0 && record.num_node_features() != dim {
            return Err(Error::MalformedInput(format!(
                "graph {k}: feature dimension {}, expected {dim}",
                record.num_node_features()
            )));
        }
        if record.masks.is_some() != with_masks {
            return Err(Error::MalformedInput(format!(
                "graph {k}: masks must be present on all graphs or none"
            )));
        }

        let offset = storage.node_features.len();
        let edge_start = storage.edge_index.len();
        let label_start = storage.labels.len();

        storage.edge_index.extend(
            record.edge_index.iter().map(|&(src, dst)| (src + offset, dst + offset)),
        );
        storage.labels.extend_from_slice(record.label.as_slice());
        if let (Some(all), Some(masks)) = (storage.masks.as_mut(), record.masks.as_ref()) {
            all.extend_from(masks);
        }
        storage.node_features.extend(record.node_features);

        slices.push(GraphSlice {
            nodes: offset..storage.node_features.len(),
            edges: edge_start..storage.edge_index.len(),
            labels: label_start..storage.labels.len(),
        });
    }

    debug!(
        graphs = slices.len(),
        nodes = storage.node_features.len(),
        edges = storage.edge_index.len(),
        "collated graph records"
    );

    CollatedDataset::from_parts(storage, slices)
}

impl CollatedDataset {
    /// Reconstruct graph `idx` with node-local edge endpoints.
    pub fn get(&self, idx: usize) -> Result<GraphRecord> {
        let slice = self.slices().get(idx).ok_or_else(|| {
            Error::NotFound(format!("graph {idx} (dataset holds {})", self.len()))
        })?;
        let storage = self.storage();
        let offset = slice.nodes.start;
        let level = storage
            .label_level
            .ok_or_else(|| Error::MalformedInput("label level missing".into()))?;

        Ok(GraphRecord {
            node_features: storage.node_features[slice.nodes.clone()].to_vec(),
            edge_index: storage.edge_index[slice.edges.clone()]
                .iter()
                .map(|&(src, dst)| (src - offset, dst - offset))
                .collect(),
            label: Label::from_slice(level, &storage.labels[slice.labels.clone()])?,
            masks: storage.masks.as_ref().map(|m| m.slice(slice.nodes.clone())),
        })
    }

    /// Iterate over all graphs in order.
    pub fn iter(&self) -> impl Iterator<Item = Result<GraphRecord>> + '_ {
        (0..self.len()).map(move |idx| self.get(idx))
    }

    /// Unpack back into records, e.g. to re-filter and re-collate.
    pub fn to_records(&self) -> Result<Vec<GraphRecord>> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn path(n: usize, label: usize) -> GraphRecord {
        let edges = (1..n).flat_map(|i| [(i - 1, i), (i, i - 1)]).collect();
        GraphRecord::new(vec![vec![1.0]; n], edges, Label::Graph(label))
    }

    #[test]
    fn test_collate_offsets_edges() {
        let data = collate(vec![path(2, 0), path(3, 1)]).unwrap();
        let storage = data.storage();

        assert_eq!(storage.node_features.len(), 5);
        assert_eq!(storage.labels, vec![0, 1]);
        assert_eq!(
            storage.edge_index,
            vec![(0, 1), (1, 0), (2, 3), (3, 2), (3, 4), (4, 3)]
        );

        let second = data.slices().get(1).unwrap();
        assert_eq!(second.nodes, 2..5);
        assert_eq!(second.edges, 2..6);
        assert_eq!(second.labels, 1..2);
    }

    #[test]
    fn test_collate_empty() {
        let data = collate(Vec::new()).unwrap();
        assert!(data.is_empty());
        assert!(data.storage().node_features.is_empty());
        assert!(data.storage().edge_index.is_empty());
        assert!(data.storage().labels.is_empty());
    }

    #[test]
    fn test_get_roundtrips_record() {
        let records = vec![path(4, 1), path(2, 0), path(3, 1)];
        let data = collate(records.clone()).unwrap();
        assert_eq!(data.to_records().unwrap(), records);
    }

    #[test]
    fn test_get_out_of_range() {
        let data = collate(vec![path(2, 0)]).unwrap();
        assert!(matches!(data.get(1), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_node_labels_and_masks() {
        let masks = NodeMasks::new(vec![true, false], vec![false, true], vec![false, false]).unwrap();
        let record = GraphRecord::new(vec![vec![0.5, 1.0]; 2], vec![(0, 1)], Label::Node(vec![2, 0]))
            .with_masks(masks.clone());
        let data = collate(vec![record.clone()]).unwrap();

        assert_eq!(data.storage().labels, vec![2, 0]);
        assert_eq!(data.storage().masks.as_ref(), Some(&masks));
        assert_eq!(data.get(0).unwrap(), record);
    }

    #[test]
    fn test_mixed_label_levels_rejected() {
        let node_level = GraphRecord::new(vec![vec![1.0]], Vec::new(), Label::Node(vec![0]));
        let result = collate(vec![path(2, 0), node_level]);
        assert!(matches!(result, Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_mixed_feature_dims_rejected() {
        let wide = GraphRecord::new(vec![vec![1.0, 2.0]], Vec::new(), Label::Graph(0));
        assert!(collate(vec![path(2, 0), wide]).is_err());
    }

    #[test]
    fn test_invalid_record_rejected() {
        let mut bad = path(2, 0);
        bad.edge_index.push((0, 7));
        let err = collate(vec![path(2, 0), bad]).unwrap_err();
        assert!(err.to_string().contains("graph 1"));
    }

    #[test]
    fn test_deterministic() {
        let records = vec![path(3, 0), path(5, 1)];
        assert_eq!(collate(records.clone()).unwrap(), collate(records).unwrap());
    }

    proptest! {
        #[test]
        fn prop_slices_partition_arrays(sizes in prop::collection::vec((1usize..8, 0usize..3), 1..10)) {
            let records: Vec<_> = sizes.iter().map(|&(n, c)| path(n, c)).collect();
            let data = collate(records).unwrap();

            prop_assert_eq!(data.slices().len(), sizes.len());
            let (mut nodes, mut edges) = (0, 0);
            for (slice, &(n, _)) in data.slices().iter().zip(&sizes) {
                prop_assert_eq!(slice.nodes.clone(), nodes..nodes + n);
                prop_assert_eq!(slice.edges.start, edges);
                nodes = slice.nodes.end;
                edges = slice.edges.end;
            }
            prop_assert_eq!(nodes, data.storage().node_features.len());
            prop_assert_eq!(edges, data.storage().edge_index.len());
        }
    }
}
