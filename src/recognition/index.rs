//! Exact nearest-neighbor index over enrolled face embeddings.
//!
//! A flat squared-L2 index over unit vectors, shared read-mostly across
//! sessions behind an `Arc`. Rebuilds assemble the replacement off to the
//! side and swap it in under the write lock, so a search never observes a
//! mix of old and new entries.

use std::sync::RwLock;

use ndarray::Array1;

use crate::error::Error;

/// One enrolled embedding with its identity label.
#[derive(Debug, Clone)]
pub struct IdentityRecord {
    pub label: String,
    pub embedding: Array1<f32>,
}

/// A search result, best-first.
#[derive(Debug, Clone)]
pub struct Neighbor {
    pub label: String,
    /// Squared Euclidean distance between query and the enrolled vector.
    pub distance: f32,
}

#[derive(Debug, Default)]
struct IndexState {
    labels: Vec<String>,
    vectors: Vec<Array1<f32>>,
}

/// Nearest-neighbor search over L2-normalized embedding vectors labeled by
/// identity. Entries change only through explicit enrollment operations,
/// never through the tracking engine.
#[derive(Debug)]
pub struct IdentityIndex {
    dim: usize,
    state: RwLock<IndexState>,
}

impl IdentityIndex {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            state: RwLock::new(IndexState::default()),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Add one embedding for a label. The vector is L2-normalized before
    /// storage and never mutated afterwards.
    pub fn add(&self, label: impl Into<String>, embedding: Array1<f32>) -> Result<(), Error> {
        let vector = self.prepare(embedding)?;
        let mut state = self.state.write().map_err(|_| Error::IndexPoisoned)?;
        state.labels.push(label.into());
        state.vectors.push(vector);
        Ok(())
    }

    /// Remove every embedding enrolled under `label`. Returns the number of
    /// vectors removed.
    pub fn remove_label(&self, label: &str) -> Result<usize, Error> {
        let mut state = self.state.write().map_err(|_| Error::IndexPoisoned)?;
        let before = state.labels.len();

        let keep: Vec<bool> = state.labels.iter().map(|l| l != label).collect();
        let mut keep_labels = keep.iter().copied();
        state.labels.retain(|_| keep_labels.next().unwrap_or(true));
        let mut keep_vectors = keep.iter().copied();
        state.vectors.retain(|_| keep_vectors.next().unwrap_or(true));

        Ok(before - state.labels.len())
    }

    /// Replace the entire index contents atomically. Concurrent searches see
    /// either the old contents or the new, never a mix.
    pub fn rebuild(&self, records: Vec<IdentityRecord>) -> Result<(), Error> {
        let mut next = IndexState {
            labels: Vec::with_capacity(records.len()),
            vectors: Vec::with_capacity(records.len()),
        };
        for record in records {
            next.vectors.push(self.prepare(record.embedding)?);
            next.labels.push(record.label);
        }

        let mut state = self.state.write().map_err(|_| Error::IndexPoisoned)?;
        *state = next;
        Ok(())
    }

    /// Return up to `k` nearest neighbors of `query`, best-first. An empty
    /// index yields an empty list.
    pub fn search(&self, query: &Array1<f32>, k: usize) -> Result<Vec<Neighbor>, Error> {
        if query.len() != self.dim {
            return Err(Error::DimensionMismatch {
                expected: self.dim,
                got: query.len(),
            });
        }

        let state = self.state.read().map_err(|_| Error::IndexPoisoned)?;
        let mut neighbors: Vec<Neighbor> = state
            .vectors
            .iter()
            .zip(&state.labels)
            .map(|(vector, label)| {
                let diff = query - vector;
                Neighbor {
                    label: label.clone(),
                    distance: diff.dot(&diff),
                }
            })
            .collect();

        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(k);
        Ok(neighbors)
    }

    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.labels.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enrolled labels with their vector counts, sorted by label.
    pub fn labels(&self) -> Result<Vec<(String, usize)>, Error> {
        let state = self.state.read().map_err(|_| Error::IndexPoisoned)?;
        let mut counts = std::collections::BTreeMap::new();
        for label in &state.labels {
            *counts.entry(label.clone()).or_insert(0usize) += 1;
        }
        Ok(counts.into_iter().collect())
    }

    fn prepare(&self, embedding: Array1<f32>) -> Result<Array1<f32>, Error> {
        if embedding.len() != self.dim {
            return Err(Error::DimensionMismatch {
                expected: self.dim,
                got: embedding.len(),
            });
        }
        l2_normalize(embedding).ok_or(Error::DegenerateEmbedding)
    }
}

/// Scale a vector to unit L2 norm. Returns `None` for a zero or non-finite
/// vector.
pub fn l2_normalize(vector: Array1<f32>) -> Option<Array1<f32>> {
    let norm = vector.dot(&vector).sqrt();
    if !norm.is_finite() || norm == 0.0 {
        return None;
    }
    Some(vector / norm)
}
