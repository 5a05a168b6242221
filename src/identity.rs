//! Identity label produced by recognition and consumed by tracking.

use std::fmt;

/// Resolved identity of a detected face.
///
/// `Unknown` is a first-class outcome, not an error: it is voted on and
/// reported just like a named identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    Unknown,
    Known(String),
}

impl Identity {
    pub fn known(name: impl Into<String>) -> Self {
        Identity::Known(name.into())
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Identity::Unknown)
    }

    /// The enrolled name, if this identity is known.
    pub fn name(&self) -> Option<&str> {
        match self {
            Identity::Unknown => None,
            Identity::Known(name) => Some(name.as_str()),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Unknown => f.write_str("UNKNOWN"),
            Identity::Known(name) => f.write_str(name),
        }
    }
}
