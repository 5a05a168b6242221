//! A single tracked face across frames, independent of identity.

use std::collections::HashMap;

use ndarray::{Array1, Array2};

use crate::config::TrackingConfig;
use crate::identity::Identity;
use crate::pipeline::FaceImage;
use crate::tracker::kalman_filter::KalmanFilter;

/// Final verdict for an expired track: who it was, with the last snapshot.
#[derive(Debug, Clone)]
pub struct TrackSummary {
    pub identity: Identity,
    pub image: FaceImage,
}

/// One tracked face: position estimator, remaining lifetime, and the
/// accumulated identity-vote histogram.
#[derive(Debug, Clone)]
pub struct Track {
    /// Stable identifier, assigned monotonically per session.
    pub track_id: u64,
    /// Last observed centroid.
    pub position: (f32, f32),
    /// Most recently observed identity, for display only.
    pub last_identity: Identity,
    /// Frames left before the track expires; refreshed on every match.
    life: u32,
    /// Kalman state mean `[x, y, vx, vy]`.
    mean: Array1<f64>,
    /// Kalman state covariance (4x4).
    covariance: Array2<f64>,
    /// Votes per identity, grow-only for the lifetime of the track.
    votes: HashMap<Identity, u32>,
    /// Most recent cropped face, retained for reporting.
    snapshot: FaceImage,
}

impl Track {
    pub fn new(
        track_id: u64,
        position: (f32, f32),
        image: FaceImage,
        identity: Identity,
        kalman_filter: &KalmanFilter,
        max_life: u32,
    ) -> Self {
        let (mean, covariance) = kalman_filter.initiate([position.0 as f64, position.1 as f64]);
        let mut votes = HashMap::new();
        votes.insert(identity.clone(), 1);

        Self {
            track_id,
            position,
            last_identity: identity,
            life: max_life,
            mean,
            covariance,
            votes,
            snapshot: image,
        }
    }

    /// Advance the estimator one frame and return the predicted centroid.
    ///
    /// A numerically degenerate prediction falls back to the last observed
    /// position and leaves the filter state untouched.
    pub fn predict_position(&mut self, kalman_filter: &KalmanFilter) -> (f32, f32) {
        let (mean, covariance) = kalman_filter.predict(&self.mean, &self.covariance);
        if mean.iter().any(|v| !v.is_finite()) {
            log::warn!(
                "track {}: non-finite prediction, falling back to last position",
                self.track_id
            );
            return self.position;
        }
        let predicted = (mean[0] as f32, mean[1] as f32);
        self.mean = mean;
        self.covariance = covariance;
        predicted
    }

    /// Fold a matched detection into the track: correct the estimator,
    /// refresh the lifetime, and record the identity vote.
    pub fn observe(
        &mut self,
        position: (f32, f32),
        image: FaceImage,
        identity: Identity,
        kalman_filter: &KalmanFilter,
        max_life: u32,
    ) {
        let (mean, covariance) = kalman_filter.update(
            &self.mean,
            &self.covariance,
            [position.0 as f64, position.1 as f64],
        );
        self.mean = mean;
        self.covariance = covariance;

        self.position = position;
        self.snapshot = image;
        self.life = max_life;
        *self.votes.entry(identity.clone()).or_insert(0) += 1;
        self.last_identity = identity;
    }

    /// Decrement the lifetime of an unmatched track. Returns `true` once the
    /// track has expired.
    pub fn age(&mut self) -> bool {
        self.life = self.life.saturating_sub(1);
        self.life == 0
    }

    pub fn life(&self) -> u32 {
        self.life
    }

    pub fn votes(&self) -> &HashMap<Identity, u32> {
        &self.votes
    }

    /// Reduce the vote histogram to a verdict.
    ///
    /// The best named identity must have at least `sure_known` votes to
    /// qualify. The track is unknown when its unknown votes reach
    /// `max(sure_unknown, 2 * best)`, and the best name wins only while the
    /// unknown votes stay within twice its own count. Both comparisons are
    /// inclusive and the unknown rule is checked first, so a track sitting
    /// exactly on the 2x boundary resolves to unknown. A track with no clear
    /// majority either way yields no summary at all.
    pub fn summarize(&self, config: &TrackingConfig) -> Option<TrackSummary> {
        let best = self
            .votes
            .iter()
            .filter(|&(identity, &count)| !identity.is_unknown() && count >= config.sure_known)
            .max_by(|(a_id, a_count), (b_id, b_count)| {
                a_count
                    .cmp(b_count)
                    .then_with(|| b_id.to_string().cmp(&a_id.to_string()))
            });

        let best_count = best.map(|(_, &count)| count).unwrap_or(0);
        let unknown_count = self.votes.get(&Identity::Unknown).copied().unwrap_or(0);

        if unknown_count >= config.sure_unknown.max(best_count * 2) {
            return Some(TrackSummary {
                identity: Identity::Unknown,
                image: self.snapshot.clone(),
            });
        }

        if let Some((identity, &count)) = best {
            if unknown_count <= count * 2 {
                return Some(TrackSummary {
                    identity: identity.clone(),
                    image: self.snapshot.clone(),
                });
            }
        }

        None
    }
}
