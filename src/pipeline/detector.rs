//! Traits for the external detection and embedding capabilities.

use ndarray::Array1;

use crate::pipeline::frame::{FaceImage, Frame};
use crate::tracker::Rect;

/// One detected face in a frame.
#[derive(Debug, Clone)]
pub struct FaceDetection {
    /// Bounding box in frame coordinates.
    pub bbox: Rect,
    /// Detection confidence score.
    pub score: f32,
}

impl FaceDetection {
    pub fn new(bbox: Rect, score: f32) -> Self {
        Self { bbox, score }
    }
}

/// Face bounding-box detection backend.
///
/// Implement this trait to connect any detection model to the tracking
/// engine. A frame with no faces is an `Ok(vec![])`, not an error; a
/// detector error is absorbed by the pipeline as "no detections".
pub trait FaceDetector {
    /// Error type for detection failures.
    type Error: std::fmt::Display;

    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceDetection>, Self::Error>;
}

/// Embedding extraction backend.
///
/// Stateless inference: one instance may be shared across sessions. `None`
/// signals that no embedding could be computed for the crop, which the
/// pipeline treats as a skip, not an error.
pub trait FaceEmbedder: Send + Sync {
    fn embed(&self, face: &FaceImage) -> Option<Array1<f32>>;
}
