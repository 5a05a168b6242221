//! Crate error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// An embedding's dimensionality does not match the index.
    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A zero or non-finite embedding cannot be L2-normalized.
    #[error("embedding has zero or non-finite norm")]
    DegenerateEmbedding,

    /// The identity index lock was poisoned by a panicking writer.
    #[error("identity index lock poisoned")]
    IndexPoisoned,

    /// The embedding worker pool shut down while a frame was in flight.
    #[error("embedding worker pool disconnected")]
    WorkerLost,

    /// A session key is already registered.
    #[error("session {0:?} already exists")]
    DuplicateSession(String),
}
