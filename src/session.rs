//! Session-level concerns: frame classification against the external
//! ledger, and the registry of live sessions.

mod classifier;
mod registry;

pub use classifier::{
    FrameOutcome, Ledger, LedgerStatus, SessionClassifier, SessionStatus, SightingSink,
};
pub use registry::SessionRegistry;
