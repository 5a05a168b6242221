//! Session-level classification of expired-track summaries.
//!
//! Coordinates with an external ledger to avoid duplicate reporting and
//! reduces each frame's batch of verdicts to a single status code.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::Identity;
use crate::pipeline::FaceImage;
use crate::tracker::TrackSummary;

/// Result of marking an identity as seen in the external per-session ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerStatus {
    /// First sighting this session.
    NewlySet,
    /// The identity was already recorded this session.
    AlreadyLogged,
    /// The session is closing; nothing further can be recorded.
    SessionClosed,
    /// The ledger could not be consulted.
    Error,
}

/// External per-session record of which identities have been logged.
///
/// Implementations must be race-free across concurrent callers for the
/// same label within a session.
pub trait Ledger {
    fn check_and_mark(&self, label: &str) -> LedgerStatus;
}

/// Destination for sighting reports (persisted detection logs).
pub trait SightingSink {
    /// Persist one sighting. Returns `false` on failure.
    fn persist(&self, identity: &Identity, image: &FaceImage) -> bool;
}

/// Session-level status emitted once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    NotFound,
    FoundPerson,
    FoundUnknown,
    FoundPersonAndUnknown,
    AlreadyLogged,
    SessionEnd,
    Error,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::NotFound => "NOT_FOUND",
            SessionStatus::FoundPerson => "FOUND_PERSON",
            SessionStatus::FoundUnknown => "FOUND_UNKNOWN",
            SessionStatus::FoundPersonAndUnknown => "FOUND_PERSON_AND_UNKNOWN",
            SessionStatus::AlreadyLogged => "ALREADY_LOGGED",
            SessionStatus::SessionEnd => "SESSION_END",
            SessionStatus::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Per-frame classification result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameOutcome {
    pub status: SessionStatus,
    pub message: String,
}

impl FrameOutcome {
    fn new(status: SessionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Reduces a batch of finalized track summaries to one session status.
pub struct SessionClassifier<L, S> {
    ledger: L,
    sink: S,
}

impl<L: Ledger, S: SightingSink> SessionClassifier<L, S> {
    pub fn new(ledger: L, sink: S) -> Self {
        Self { ledger, sink }
    }

    /// Classify one frame's expired tracks.
    ///
    /// Ledger failures and sighting-persistence failures for newly seen
    /// identities short-circuit the whole batch; tallies collected before
    /// the short-circuit are discarded.
    pub fn classify(&self, summaries: &[TrackSummary]) -> FrameOutcome {
        if summaries.is_empty() {
            return FrameOutcome::new(SessionStatus::NotFound, "no faces left tracking");
        }

        let mut found: Vec<&str> = Vec::new();
        let mut already: Vec<&str> = Vec::new();
        let mut unknown_count = 0usize;

        for summary in summaries {
            let Some(name) = summary.identity.name() else {
                // Unknown sightings are reported for review; a failure to
                // persist one does not abort the frame.
                if !self.sink.persist(&Identity::Unknown, &summary.image) {
                    log::warn!("failed to persist unknown sighting");
                }
                unknown_count += 1;
                continue;
            };

            match self.ledger.check_and_mark(name) {
                LedgerStatus::NewlySet => {
                    if !self.sink.persist(&summary.identity, &summary.image) {
                        return FrameOutcome::new(
                            SessionStatus::Error,
                            format!("failed to persist sighting of {name}"),
                        );
                    }
                    found.push(name);
                }
                LedgerStatus::AlreadyLogged => already.push(name),
                LedgerStatus::SessionClosed => {
                    return FrameOutcome::new(
                        SessionStatus::SessionEnd,
                        "session is closing, sighting not recorded",
                    );
                }
                LedgerStatus::Error => {
                    return FrameOutcome::new(
                        SessionStatus::Error,
                        format!("ledger check failed for {name}"),
                    );
                }
            }
        }

        if !found.is_empty() && unknown_count == 0 {
            return FrameOutcome::new(
                SessionStatus::FoundPerson,
                format!("found {} person(s): {}", found.len(), found.join(", ")),
            );
        }

        if found.is_empty() && already.is_empty() && unknown_count > 0 {
            return FrameOutcome::new(
                SessionStatus::FoundUnknown,
                format!("{unknown_count} unidentified face(s)"),
            );
        }

        if found.is_empty() && unknown_count > 0 && !already.is_empty() {
            return FrameOutcome::new(
                SessionStatus::FoundPersonAndUnknown,
                format!(
                    "already logged: {} / {unknown_count} unidentified face(s)",
                    already.join(", ")
                ),
            );
        }

        if !found.is_empty() && unknown_count > 0 {
            return FrameOutcome::new(
                SessionStatus::FoundPersonAndUnknown,
                format!(
                    "found {}: {} / {unknown_count} unidentified face(s)",
                    found.len(),
                    found.join(", ")
                ),
            );
        }

        if found.is_empty() && unknown_count == 0 && !already.is_empty() {
            return FrameOutcome::new(
                SessionStatus::AlreadyLogged,
                format!("all persons already logged: {}", already.join(", ")),
            );
        }

        // Unreachable given the tally semantics above; reaching it means a
        // defect in the branches, so surface it loudly.
        log::error!(
            "unclassifiable tallies: found={}, already={}, unknown={unknown_count}",
            found.len(),
            already.len()
        );
        FrameOutcome::new(SessionStatus::Error, "unclassifiable tracking result")
    }
}
