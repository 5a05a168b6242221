//! Per-frame orchestration: detect, embed, match, track, classify.

use std::sync::Arc;

use crate::config::{PoolConfig, TrackingConfig};
use crate::pipeline::detector::{FaceDetector, FaceEmbedder};
use crate::pipeline::embed_pool::EmbedPool;
use crate::pipeline::frame::Frame;
use crate::recognition::IdentityMatcher;
use crate::session::{FrameOutcome, Ledger, SessionClassifier, SessionStatus, SightingSink};
use crate::tracker::{Observation, TrackManager, TrackSummary};

const KNOWN_COLOR: [u8; 3] = [0, 255, 0];
const UNKNOWN_COLOR: [u8; 3] = [255, 0, 0];
const SKIPPED_COLOR: [u8; 3] = [160, 160, 160];

/// Drives one tracking session over one stream.
///
/// Frames are strictly sequential (`&mut self`); embedding extraction for
/// the faces within a frame runs in parallel on the pool. All collaborators
/// are injected at construction; the embedder may be shared across sessions.
pub struct FrameProcessor<D, L, S> {
    detector: D,
    pool: EmbedPool,
    matcher: IdentityMatcher,
    manager: TrackManager,
    classifier: SessionClassifier<L, S>,
}

impl<D, L, S> FrameProcessor<D, L, S>
where
    D: FaceDetector,
    L: Ledger,
    S: SightingSink,
{
    pub fn new<E>(
        detector: D,
        embedder: Arc<E>,
        matcher: IdentityMatcher,
        classifier: SessionClassifier<L, S>,
        tracking_config: TrackingConfig,
        pool_config: PoolConfig,
    ) -> Self
    where
        E: FaceEmbedder + 'static,
    {
        Self {
            detector,
            pool: EmbedPool::new(embedder, &pool_config),
            matcher,
            manager: TrackManager::new(tracking_config),
            classifier,
        }
    }

    /// Process one frame: returns the annotated frame (or a copy of the
    /// original when nothing was detected) and the session status.
    pub fn process_frame(&mut self, frame: &Frame) -> (Frame, FrameOutcome) {
        let detections = match self.detector.detect(frame) {
            Ok(detections) => detections,
            Err(err) => {
                // A failed detector reads as an empty frame; tracks age one
                // step and the stream keeps going.
                log::warn!("detection failed: {err}, treating frame as empty");
                Vec::new()
            }
        };

        if detections.is_empty() {
            let expired = self.manager.observe_frame(Vec::new());
            let outcome = self.classifier.classify(&expired);
            return (frame.clone(), outcome);
        }

        // Crop every detected face; detections whose clamped region is
        // empty are dropped here, the same way a failed embedding is.
        let mut cropped = Vec::with_capacity(detections.len());
        for detection in detections {
            match frame.crop(&detection.bbox) {
                Some(image) => cropped.push((detection, image)),
                None => log::debug!("detection outside frame bounds, skipped"),
            }
        }

        let crops = cropped.iter().map(|(_, image)| image.clone()).collect();
        let embeddings = match self.pool.run(crops) {
            Ok(embeddings) => embeddings,
            Err(err) => {
                log::error!("embedding pool failure: {err}");
                let outcome = FrameOutcome {
                    status: SessionStatus::Error,
                    message: format!("embedding failed: {err}"),
                };
                return (frame.clone(), outcome);
            }
        };

        let mut annotated = frame.clone();
        let mut observations = Vec::with_capacity(cropped.len());
        for ((detection, image), embedding) in cropped.into_iter().zip(embeddings) {
            let Some(embedding) = embedding else {
                // No embedding for this face: skip it entirely, the other
                // detections in the frame proceed normally.
                log::debug!("no embedding for detection, skipped");
                annotated.draw_box(&detection.bbox, SKIPPED_COLOR);
                continue;
            };

            let identity = self.matcher.resolve(&embedding);
            let color = if identity.is_unknown() {
                UNKNOWN_COLOR
            } else {
                KNOWN_COLOR
            };
            annotated.draw_box(&detection.bbox, color);

            observations.push(Observation {
                position: detection.bbox.center(),
                image,
                identity,
            });
        }

        let expired = self.manager.observe_frame(observations);
        let outcome = self.classifier.classify(&expired);
        (annotated, outcome)
    }

    /// Flush every live track through the expiry path. Called at session
    /// teardown (disconnect or timeout) before releasing the session.
    pub fn flush_session(&mut self) -> Vec<TrackSummary> {
        self.manager.flush()
    }

    /// The live track set, for inspection.
    pub fn manager(&self) -> &TrackManager {
        &self.manager
    }

    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }
}
