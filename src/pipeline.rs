//! Frame pipeline: external capability traits, the embedding worker pool,
//! and the per-session orchestrator.

mod detector;
mod embed_pool;
mod frame;
mod processor;

pub use detector::{FaceDetection, FaceDetector, FaceEmbedder};
pub use embed_pool::EmbedPool;
pub use frame::{FaceImage, Frame};
pub use processor::FrameProcessor;
