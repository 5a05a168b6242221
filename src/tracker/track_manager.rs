//! Per-session track set: association, aging, and expiry.

use crate::config::TrackingConfig;
use crate::identity::Identity;
use crate::pipeline::FaceImage;
use crate::tracker::kalman_filter::KalmanFilter;
use crate::tracker::track::{Track, TrackSummary};

/// One resolved detection for the current frame.
#[derive(Debug, Clone)]
pub struct Observation {
    /// Detection centroid in frame coordinates.
    pub position: (f32, f32),
    /// Cropped face image.
    pub image: FaceImage,
    /// Identity resolved by the matcher for this single frame.
    pub identity: Identity,
}

/// Owns the live tracks of one stream session.
///
/// Frames are strictly sequential per session; the manager holds no locks
/// and is driven by exactly one caller.
pub struct TrackManager {
    config: TrackingConfig,
    kalman_filter: KalmanFilter,
    tracks: Vec<Track>,
    next_id: u64,
}

impl TrackManager {
    pub fn new(config: TrackingConfig) -> Self {
        Self {
            config,
            kalman_filter: KalmanFilter::new(),
            tracks: Vec::new(),
            next_id: 0,
        }
    }

    fn next_track_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Process one frame's observations.
    ///
    /// Tracks are predicted once, then each observation is assigned to the
    /// first unassigned track (in creation order) whose predicted position
    /// lies within the gating distance. Matched tracks are corrected and
    /// refreshed; unmatched observations spawn new tracks; unmatched tracks
    /// age one step. Returns the summaries of every track that expired this
    /// frame.
    pub fn observe_frame(&mut self, observations: Vec<Observation>) -> Vec<TrackSummary> {
        let threshold_sq = self.config.distance_threshold * self.config.distance_threshold;

        let predicted: Vec<(f32, f32)> = self
            .tracks
            .iter_mut()
            .map(|track| track.predict_position(&self.kalman_filter))
            .collect();

        let mut matched = vec![false; self.tracks.len()];
        let mut spawned = Vec::new();

        for observation in observations {
            let slot = (0..self.tracks.len()).find(|&i| {
                !matched[i] && dist_sq(predicted[i], observation.position) < threshold_sq
            });

            match slot {
                Some(i) => {
                    self.tracks[i].observe(
                        observation.position,
                        observation.image,
                        observation.identity,
                        &self.kalman_filter,
                        self.config.max_life,
                    );
                    matched[i] = true;
                }
                None => {
                    let id = self.next_track_id();
                    spawned.push(Track::new(
                        id,
                        observation.position,
                        observation.image,
                        observation.identity,
                        &self.kalman_filter,
                        self.config.max_life,
                    ));
                }
            }
        }

        // Age every track that went unmatched this frame and finalize the
        // ones that ran out of life.
        let mut summaries = Vec::new();
        let mut index = 0;
        self.tracks.retain_mut(|track| {
            let was_matched = matched[index];
            index += 1;
            if was_matched || !track.age() {
                return true;
            }
            log::debug!("track {} expired", track.track_id);
            if let Some(summary) = track.summarize(&self.config) {
                summaries.push(summary);
            }
            false
        });

        self.tracks.append(&mut spawned);
        summaries
    }

    /// Drain every live track through the expiry path. Called at session
    /// teardown so each track still gets a best-effort verdict.
    pub fn flush(&mut self) -> Vec<TrackSummary> {
        self.tracks
            .drain(..)
            .filter_map(|track| track.summarize(&self.config))
            .collect()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[inline]
fn dist_sq(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    dx * dx + dy * dy
}
