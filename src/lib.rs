//! facetrack-rs: multi-face tracking and identity resolution.
//!
//! Tracks multiple moving faces across a video stream, resolves each track
//! to an enrolled identity via nearest-neighbor search over embeddings, and
//! reduces the noisy per-frame recognitions to one stable status per frame.
//!
//! Detection and embedding inference stay behind the [`pipeline::FaceDetector`]
//! and [`pipeline::FaceEmbedder`] traits; the external "already logged"
//! ledger and sighting storage sit behind [`session::Ledger`] and
//! [`session::SightingSink`]. Everything in between — track lifecycle,
//! evidence accumulation, windowed confirmation, and session classification
//! — lives here.

pub mod config;
pub mod error;
pub mod identity;
pub mod pipeline;
pub mod recognition;
pub mod session;
pub mod tracker;

pub use config::{ConfirmerConfig, MatcherConfig, PoolConfig, TrackingConfig};
pub use error::Error;
pub use identity::Identity;
pub use pipeline::{FaceDetection, FaceDetector, FaceEmbedder, FaceImage, Frame, FrameProcessor};
pub use recognition::{IdentityIndex, IdentityMatcher, IdentityRecord, WindowedConfirmer};
pub use session::{
    FrameOutcome, Ledger, LedgerStatus, SessionClassifier, SessionRegistry, SessionStatus,
    SightingSink,
};
pub use tracker::{Observation, TrackManager, TrackSummary};
