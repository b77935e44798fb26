//! # BA-LRP Synthetic Graphs
//!
//! Two-class graph classification benchmark. Every graph grows from a single
//! edge to [`GRAPH_SIZE`] nodes, one node per step, each new node attaching
//! to existing nodes sampled from a categorical distribution over degrees:
//!
//! | Class | Rule | Attachment weight | Edges per step |
//! |-------|------|-------------------|----------------|
//! | 0 | preferential | `deg(v)` | 1 |
//! | 1 | inverse preferential | `1 / (deg(v) + ε)` | 2 when `i % 5 == 4`, else 1 |
//!
//! Class 0 therefore grows hubs while class 1 stays flat and slightly denser
//! (23 undirected edges against 19).

use rand::distributions::{Distribution, WeightedIndex};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::model::{GraphRecord, Label};
use crate::{Error, Result};

/// Remote location of the pre-generated BA-LRP raw bundle.
pub const BA_LRP_URL: &str =
    "https://github.com/divelab/DIG_storage/raw/main/xgraph/datasets/ba_lrp/raw.pt";

/// Nodes per generated graph.
pub const GRAPH_SIZE: usize = 20;

const SEED_NODES: usize = 2;
const EPSILON: f64 = 1e-30;

// ============================================================================
// Configuration
// ============================================================================

/// BA-LRP generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaLrpConfig {
    /// Graphs per class; the dataset holds twice as many.
    pub num_per_class: usize,
    /// Fixed seed for reproducible output; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Where to fetch the pre-generated raw bundle from.
    pub url: String,
}

impl Default for BaLrpConfig {
    fn default() -> Self {
        Self {
            num_per_class: 10_000,
            seed: None,
            url: BA_LRP_URL.to_string(),
        }
    }
}

impl BaLrpConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidConfig(format!("BA-LRP config: {e}")))
    }
}

// ============================================================================
// Attachment rules
// ============================================================================

/// Growth rule of a BA-LRP class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attachment {
    Preferential,
    InversePreferential,
}

impl Attachment {
    pub fn label(self) -> usize {
        match self {
            Attachment::Preferential => 0,
            Attachment::InversePreferential => 1,
        }
    }

    fn weights(self, degrees: &[usize]) -> Vec<f64> {
        match self {
            Attachment::Preferential => degrees.iter().map(|&d| d as f64).collect(),
            Attachment::InversePreferential => {
                degrees.iter().map(|&d| 1.0 / (d as f64 + EPSILON)).collect()
            }
        }
    }

    /// Distinct targets the node added at step `i` attaches to.
    fn picks_at(self, i: usize) -> usize {
        match self {
            Attachment::InversePreferential if i % 5 == 4 => 2,
            _ => 1,
        }
    }
}

// ============================================================================
// Generator
// ============================================================================

/// Seeded BA-LRP graph generator.
pub struct BaLrpGenerator {
    rng: ChaCha8Rng,
}

impl BaLrpGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { rng }
    }

    /// Preferential-attachment graph, label 0.
    pub fn gen_class1(&mut self) -> Result<GraphRecord> {
        self.grow(Attachment::Preferential)
    }

    /// Inverse-preferential-attachment graph, label 1.
    pub fn gen_class2(&mut self) -> Result<GraphRecord> {
        self.grow(Attachment::InversePreferential)
    }

    /// `num_per_class` graphs of each class, interleaved class 0, class 1, ...
    pub fn build(&mut self, num_per_class: usize) -> Result<Vec<GraphRecord>> {
        let mut records = Vec::with_capacity(2 * num_per_class);
        for _ in 0..num_per_class {
            records.push(self.gen_class1()?);
            records.push(self.gen_class2()?);
        }
        debug!(graphs = records.len(), "generated BA-LRP graphs");
        Ok(records)
    }

    fn grow(&mut self, rule: Attachment) -> Result<GraphRecord> {
        let mut record = GraphRecord::new(
            vec![vec![1.0]; SEED_NODES],
            vec![(0, 1), (1, 0)],
            Label::Graph(rule.label()),
        );

        for i in SEED_NODES..GRAPH_SIZE {
            record.node_features.push(vec![1.0]);

            let degrees: Vec<usize> = (0..i).map(|node| record.degree(node)).collect();
            let dist = WeightedIndex::new(rule.weights(&degrees))
                .map_err(|e| Error::Sampling(format!("step {i}: {e}")))?;

            let mut picks: SmallVec<[usize; 2]> = SmallVec::new();
            for _ in 0..rule.picks_at(i) {
                let mut pick = dist.sample(&mut self.rng);
                while picks.contains(&pick) {
                    pick = dist.sample(&mut self.rng);
                }
                picks.push(pick);
                record.edge_index.extend([(pick, i), (i, pick)]);
            }
        }

        Ok(record)
    }
}
