//! Explicit registry of live tracking sessions.
//!
//! Replaces process-wide dictionaries keyed by session id: the transport
//! layer owns a registry instance and drives session lifecycle through it.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::Error;

/// Maps a session key to its session state (typically a frame processor).
///
/// Thread-safe so connect/disconnect handlers on different threads can
/// share one registry.
pub struct SessionRegistry<S> {
    sessions: Mutex<HashMap<String, S>>,
}

impl<S> SessionRegistry<S> {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Register a new session. Fails if the key is already in use.
    pub fn create(&self, key: impl Into<String>, session: S) -> Result<(), Error> {
        let key = key.into();
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        if sessions.contains_key(&key) {
            return Err(Error::DuplicateSession(key));
        }
        sessions.insert(key, session);
        Ok(())
    }

    /// Remove a session, returning its state so the caller can flush it.
    pub fn remove(&self, key: &str) -> Option<S> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.remove(key)
    }

    /// Run a closure against one session's state.
    pub fn with_session<R>(&self, key: &str, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.get_mut(key).map(f)
    }

    pub fn contains(&self, key: &str) -> bool {
        let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S> Default for SessionRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}
