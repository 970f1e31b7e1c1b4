// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flat inner-product similarity index.
//!
//! Vectors are L2-normalized on insert and queries are normalized the same
//! way, so the inner product is the cosine similarity. Search is exhaustive:
//! per-document extraction batches are small enough that an exact scan beats
//! any approximate structure.

use std::cmp::Ordering;

use crate::errors::{SearchError, SearchResult};

/// Exhaustive cosine-similarity index over row-major vectors.
///
/// Positions returned by [`SimilarityIndex::query`] refer to the order of the
/// vectors passed to the last [`SimilarityIndex::build`] call.
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    dimension: usize,
    len: usize,
    data: Vec<f32>,
}

impl SimilarityIndex {
    /// Creates an empty index. Every query against it returns no hits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an index holding `vectors`.
    pub fn from_vectors(vectors: Vec<Vec<f32>>) -> SearchResult<Self> {
        let mut index = Self::new();
        index.build(vectors)?;
        Ok(index)
    }

    /// Replaces the contents of the index with `vectors`.
    ///
    /// All vectors must share one dimension. On error the previous contents
    /// are left untouched.
    pub fn build(&mut self, vectors: Vec<Vec<f32>>) -> SearchResult<()> {
        let dimension = vectors.first().map(Vec::len).unwrap_or(0);
        let mut data = Vec::with_capacity(dimension * vectors.len());

        for vector in &vectors {
            if vector.len() != dimension {
                return Err(SearchError::DimensionMismatch {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            let start = data.len();
            data.extend_from_slice(vector);
            normalize(&mut data[start..]);
        }

        self.dimension = dimension;
        self.len = vectors.len();
        self.data = data;
        Ok(())
    }

    /// Returns up to `k` `(score, position)` pairs, best first.
    ///
    /// Scores are cosine similarities in [-1, 1]; equal scores keep build
    /// order.
    pub fn query(&self, vector: &[f32], k: usize) -> SearchResult<Vec<(f32, usize)>> {
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if vector.len() != self.dimension {
            return Err(SearchError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }

        let mut query = vector.to_vec();
        normalize(&mut query);

        let mut hits: Vec<(f32, usize)> = self
            .rows()
            .enumerate()
            .map(|(position, row)| (dot(row, &query).clamp(-1.0, 1.0), position))
            .collect();

        hits.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.cmp(&b.1))
        });
        hits.truncate(k);

        Ok(hits)
    }

    /// Number of indexed vectors
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Vector dimension, or 0 for an empty index
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Iterates over the stored (normalized) rows
    fn rows(&self) -> impl Iterator<Item = &[f32]> {
        // not chunks_exact: a zero-dimension index still has `len` rows
        let width = self.dimension;
        (0..self.len).map(move |i| &self.data[i * width..(i + 1) * width])
    }
}

/// Cosine similarity of two vectors, 0.0 when either is zero or the lengths differ
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    (dot(a, b) / (magnitude_a * magnitude_b)).clamp(-1.0, 1.0)
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vector.iter_mut() {
        *value /= norm;
    }
}
