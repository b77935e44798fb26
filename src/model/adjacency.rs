//! Dense adjacency matrix and its conversion to a sparse edge index.

use super::Edge;
use crate::{Error, Result};

/// Dense square adjacency matrix, row-major.
///
/// Entry `(i, j)` is nonzero iff there is an edge from `i` to `j`. Values
/// may be weights; only their zero-ness matters for conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyMatrix {
    dim: usize,
    values: Vec<f64>,
}

impl AdjacencyMatrix {
    pub fn zeros(dim: usize) -> Self {
        Self { dim, values: vec![0.0; dim * dim] }
    }

    /// Build from nested rows. Fails unless every row has `rows.len()` entries.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let dim = rows.len();
        let mut values = Vec::with_capacity(dim * dim);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != dim {
                return Err(Error::MalformedInput(format!(
                    "adjacency row {i} has {} entries, expected {dim}",
                    row.len()
                )));
            }
            values.extend(row);
        }
        Ok(Self { dim, values })
    }

    /// Number of nodes (rows == columns).
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.dim + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.values[i * self.dim + j] = value;
    }

    /// Number of nonzero cells.
    pub fn nnz(&self) -> usize {
        self.values.iter().filter(|v| **v != 0.0).count()
    }

    /// Sparse edge index: one directed edge `(i, j)` per nonzero cell, in
    /// row-major order.
    pub fn to_sparse(&self) -> Vec<Edge> {
        if self.dim == 0 {
            return Vec::new();
        }
        self.values
            .chunks_exact(self.dim)
            .enumerate()
            .flat_map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, v)| **v != 0.0)
                    .map(move |(j, _)| (i, j))
            })
            .collect()
    }
}
