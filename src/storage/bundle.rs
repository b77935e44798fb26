//! Processed bundle codec.
//!
//! A collated dataset is persisted as a single JSON document:
//!
//! ```text
//! { "header":  { "format", "version", "dataset", "created_at" },
//!   "storage": { node_features, edge_index, labels, masks, label_level },
//!   "slices":  { slices: [{ nodes, edges, labels }, ...] } }
//! ```
//!
//! Decoding re-checks that the slices partition the storage. Anything that
//! fails to decode is reported as `Error::CacheCorruption`.

use std::path::Path;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{CollatedDataset, GraphStorage, SliceTable};
use crate::{Error, Result};

pub const BUNDLE_FORMAT: &str = "syngraph/collated";
pub const BUNDLE_VERSION: u32 = 1;

/// Metadata stored ahead of the collated arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleHeader {
    pub format: String,
    pub version: u32,
    pub dataset: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct BundleRef<'a> {
    header: BundleHeader,
    storage: &'a GraphStorage,
    slices: &'a SliceTable,
}

#[derive(Deserialize)]
struct Bundle {
    header: BundleHeader,
    storage: GraphStorage,
    slices: SliceTable,
}

/// Serialize `data` under the given dataset name.
pub fn encode(dataset: &str, data: &CollatedDataset) -> Result<Vec<u8>> {
    let bundle = BundleRef {
        header: BundleHeader {
            format: BUNDLE_FORMAT.to_string(),
            version: BUNDLE_VERSION,
            dataset: dataset.to_string(),
            created_at: Utc::now(),
        },
        storage: data.storage(),
        slices: data.slices(),
    };
    Ok(serde_json::to_vec(&bundle)?)
}

/// Deserialize and validate a bundle read from `path`.
pub fn decode(path: &Path, bytes: &[u8]) -> Result<(BundleHeader, CollatedDataset)> {
    let corrupt = |message: String| Error::CacheCorruption {
        path: path.display().to_string(),
        message,
    };

    let bundle: Bundle = serde_json::from_slice(bytes).map_err(|e| corrupt(e.to_string()))?;

    if bundle.header.format != BUNDLE_FORMAT {
        return Err(corrupt(format!("unknown format '{}'", bundle.header.format)));
    }
    if bundle.header.version != BUNDLE_VERSION {
        return Err(corrupt(format!(
            "version {} (expected {BUNDLE_VERSION})",
            bundle.header.version
        )));
    }

    let data = CollatedDataset::from_parts(bundle.storage, bundle.slices).map_err(|e| match e {
        Error::MalformedInput(msg) => corrupt(msg),
        other => other,
    })?;

    Ok((bundle.header, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collate::collate;
    use crate::model::{GraphRecord, Label, NodeMasks};
    use pretty_assertions::assert_eq;

    fn sample() -> CollatedDataset {
        collate(vec![
            GraphRecord::new(vec![vec![1.0]; 2], vec![(0, 1), (1, 0)], Label::Graph(0)),
            GraphRecord::new(vec![vec![0.25]; 3], vec![(2, 0)], Label::Graph(1)),
        ]).unwrap()
    }

    #[test]
    fn test_encode_decode() {
        let data = sample();
        let bytes = encode("BA_2Motifs", &data).unwrap();
        let (header, decoded) = decode(Path::new("data.json"), &bytes).unwrap();

        assert_eq!(header.dataset, "BA_2Motifs");
        assert_eq!(header.version, BUNDLE_VERSION);
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_truncated_is_corrupt() {
        let bytes = encode("x", &sample()).unwrap();
        let result = decode(Path::new("data.json"), &bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(Error::CacheCorruption { .. })));
    }

    #[test]
    fn test_wrong_format_is_corrupt() {
        let mut doc: serde_json::Value = serde_json::from_slice(&encode("x", &sample()).unwrap()).unwrap();
        doc["header"]["format"] = "torch".into();
        let result = decode(Path::new("data.json"), &serde_json::to_vec(&doc).unwrap());
        assert!(matches!(result, Err(Error::CacheCorruption { .. })));
    }

    #[test]
    fn test_bad_slices_are_corrupt() {
        let mut doc: serde_json::Value = serde_json::from_slice(&encode("x", &sample()).unwrap()).unwrap();
        doc["storage"]["labels"] = serde_json::json!([0]);
        let err = decode(Path::new("p/data.json"), &serde_json::to_vec(&doc).unwrap()).unwrap_err();
        assert!(matches!(err, Error::CacheCorruption { ref path, .. } if path == "p/data.json"));
    }

    #[test]
    fn test_short_val_mask_is_corrupt() {
        let masks = NodeMasks::new(
            vec![true, false, false],
            vec![false, true, false],
            vec![false, false, true],
        ).unwrap();
        let record = GraphRecord::new(
            vec![vec![1.0]; 3],
            vec![(0, 1), (1, 0)],
            Label::Node(vec![0, 1, 0]),
        ).with_masks(masks);
        let bytes = encode("syn", &collate(vec![record]).unwrap()).unwrap();

        let mut doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        doc["storage"]["masks"]["val"] = serde_json::json!([false]);
        let result = decode(Path::new("data.json"), &serde_json::to_vec(&doc).unwrap());
        assert!(matches!(result, Err(Error::CacheCorruption { .. })));
    }
}
