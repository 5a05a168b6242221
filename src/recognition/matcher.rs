//! Per-detection identity resolution: top-k majority vote with a nearest
//! neighbor distance gate.

use std::collections::HashMap;
use std::sync::Arc;

use ndarray::Array1;

use crate::config::MatcherConfig;
use crate::identity::Identity;
use crate::recognition::index::{IdentityIndex, l2_normalize};

/// Converts a raw embedding into a label decision.
///
/// With no index loaded (or an empty one) every query resolves to
/// [`Identity::Unknown`]; that is a degraded mode, not an error.
pub struct IdentityMatcher {
    index: Option<Arc<IdentityIndex>>,
    config: MatcherConfig,
}

impl IdentityMatcher {
    pub fn new(index: Option<Arc<IdentityIndex>>, config: MatcherConfig) -> Self {
        Self { index, config }
    }

    /// Matcher that always resolves to unknown.
    pub fn unloaded(config: MatcherConfig) -> Self {
        Self::new(None, config)
    }

    pub fn index(&self) -> Option<&Arc<IdentityIndex>> {
        self.index.as_ref()
    }

    /// Resolve one embedding to an identity.
    ///
    /// The majority label among the k nearest neighbors is accepted only if
    /// the single nearest neighbor lies within the distance threshold.
    pub fn resolve(&self, embedding: &Array1<f32>) -> Identity {
        let Some(index) = &self.index else {
            return Identity::Unknown;
        };

        let Some(query) = l2_normalize(embedding.clone()) else {
            log::warn!("degenerate query embedding, resolving to unknown");
            return Identity::Unknown;
        };

        let neighbors = match index.search(&query, self.config.k_neighbors) {
            Ok(neighbors) => neighbors,
            Err(err) => {
                log::warn!("identity search failed: {err}, resolving to unknown");
                return Identity::Unknown;
            }
        };

        let Some(nearest) = neighbors.first() else {
            return Identity::Unknown;
        };
        if nearest.distance >= self.config.distance_threshold {
            return Identity::Unknown;
        }

        // Majority vote over the k labels; ties go to the label that reaches
        // the winning count first in best-first order.
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut majority: Option<&str> = None;
        let mut majority_count = 0;
        for neighbor in &neighbors {
            let count = counts.entry(neighbor.label.as_str()).or_insert(0);
            *count += 1;
            if *count > majority_count {
                majority_count = *count;
                majority = Some(neighbor.label.as_str());
            }
        }

        match majority {
            Some(label) => Identity::known(label),
            None => Identity::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec2(x: f32, y: f32) -> Array1<f32> {
        Array1::from_vec(vec![x, y])
    }

    fn enrolled_index() -> Arc<IdentityIndex> {
        let index = IdentityIndex::new(2);
        // Three of alice clustered near the x axis, two of bob near y.
        index.add("alice", vec2(1.0, 0.0)).unwrap();
        index.add("alice", vec2(0.99, 0.05)).unwrap();
        index.add("alice", vec2(0.98, -0.05)).unwrap();
        index.add("bob", vec2(0.0, 1.0)).unwrap();
        index.add("bob", vec2(0.05, 0.99)).unwrap();
        Arc::new(index)
    }

    #[test]
    fn test_majority_within_threshold() {
        let matcher = IdentityMatcher::new(Some(enrolled_index()), MatcherConfig::default());
        assert_eq!(matcher.resolve(&vec2(1.0, 0.01)), Identity::known("alice"));
    }

    #[test]
    fn test_far_query_is_unknown() {
        let matcher = IdentityMatcher::new(Some(enrolled_index()), MatcherConfig::default());
        // Opposite direction from every enrolled vector.
        assert_eq!(matcher.resolve(&vec2(-1.0, -1.0)), Identity::Unknown);
    }

    #[test]
    fn test_no_index_is_unknown() {
        let matcher = IdentityMatcher::unloaded(MatcherConfig::default());
        assert_eq!(matcher.resolve(&vec2(1.0, 0.0)), Identity::Unknown);
    }

    #[test]
    fn test_empty_index_is_unknown() {
        let index = Arc::new(IdentityIndex::new(2));
        let matcher = IdentityMatcher::new(Some(index), MatcherConfig::default());
        assert_eq!(matcher.resolve(&vec2(1.0, 0.0)), Identity::Unknown);
    }

    #[test]
    fn test_zero_embedding_is_unknown() {
        let matcher = IdentityMatcher::new(Some(enrolled_index()), MatcherConfig::default());
        assert_eq!(matcher.resolve(&vec2(0.0, 0.0)), Identity::Unknown);
    }

    #[test]
    fn test_unnormalized_query_is_normalized() {
        let matcher = IdentityMatcher::new(Some(enrolled_index()), MatcherConfig::default());
        // Same direction as alice but far from unit length.
        assert_eq!(matcher.resolve(&vec2(40.0, 0.4)), Identity::known("alice"));
    }

    #[test]
    fn test_wrong_dimension_is_unknown() {
        let matcher = IdentityMatcher::new(Some(enrolled_index()), MatcherConfig::default());
        let query = Array1::from_vec(vec![1.0, 0.0, 0.0]);
        assert_eq!(matcher.resolve(&query), Identity::Unknown);
    }
}
