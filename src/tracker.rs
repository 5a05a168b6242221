//! Track state estimation and lifecycle: Kalman filtering, association,
//! aging, and expiry summaries.

mod kalman_filter;
mod rect;
mod track;
mod track_manager;

pub use kalman_filter::KalmanFilter;
pub use rect::Rect;
pub use track::{Track, TrackSummary};
pub use track_manager::{Observation, TrackManager};
