//! Identity resolution: the enrolled embedding index, per-detection
//! matching, and windowed confirmation.

mod confirmer;
mod index;
mod matcher;

pub use confirmer::WindowedConfirmer;
pub use index::{IdentityIndex, IdentityRecord, Neighbor, l2_normalize};
pub use matcher::IdentityMatcher;
