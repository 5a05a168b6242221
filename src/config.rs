//! Tunable parameters for tracking, matching, confirmation, and embedding.

use serde::{Deserialize, Serialize};

/// Configuration for track lifecycle and identity summarization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Frames a track survives without being matched to a detection.
    #[serde(default = "default_max_life")]
    pub max_life: u32,

    /// Gating distance (pixels) between a predicted track position and a
    /// detection centroid. Compared as squared distance.
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold: f32,

    /// Minimum votes a named identity needs before a track may be
    /// summarized as that identity.
    #[serde(default = "default_sure_known")]
    pub sure_known: u32,

    /// Minimum unknown votes before a track may be summarized as unknown.
    #[serde(default = "default_sure_unknown")]
    pub sure_unknown: u32,
}

fn default_max_life() -> u32 {
    5
}

fn default_distance_threshold() -> f32 {
    250.0
}

fn default_sure_known() -> u32 {
    5
}

fn default_sure_unknown() -> u32 {
    5
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            max_life: default_max_life(),
            distance_threshold: default_distance_threshold(),
            sure_known: default_sure_known(),
            sure_unknown: default_sure_unknown(),
        }
    }
}

/// Configuration for nearest-neighbor identity matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Number of nearest neighbors consulted for the majority vote.
    #[serde(default = "default_k_neighbors")]
    pub k_neighbors: usize,

    /// The nearest neighbor must be closer than this L2 distance for the
    /// majority label to be accepted. Lower is stricter.
    #[serde(default = "default_matcher_distance_threshold")]
    pub distance_threshold: f32,
}

fn default_k_neighbors() -> usize {
    5
}

fn default_matcher_distance_threshold() -> f32 {
    0.65
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            k_neighbors: default_k_neighbors(),
            distance_threshold: default_matcher_distance_threshold(),
        }
    }
}

/// Configuration for windowed recognition confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmerConfig {
    /// Number of recent single-shot results kept in the window.
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Occurrences within the window required to confirm an identity.
    #[serde(default = "default_confirm_threshold")]
    pub confirm_threshold: usize,
}

fn default_window_size() -> usize {
    10
}

fn default_confirm_threshold() -> usize {
    5
}

impl Default for ConfirmerConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            confirm_threshold: default_confirm_threshold(),
        }
    }
}

/// Configuration for the embedding worker pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Worker threads extracting embeddings in parallel.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Bounded capacity of the job queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_workers() -> usize {
    4
}

fn default_queue_capacity() -> usize {
    8
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
        }
    }
}
