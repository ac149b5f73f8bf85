//! Session storage.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::Session;

/// Keyed storage for conversation sessions.
///
/// Handlers only go through this interface, so capacity bounds or expiry can
/// be added by swapping the implementation.
pub trait ConversationStore: Send + Sync + std::fmt::Debug {
    /// Get a session by ID.
    fn get(&self, id: &str) -> Option<Session>;

    /// Get a session by ID, creating an empty one if it doesn't exist.
    ///
    /// Concurrent callers for the same unknown ID receive the same session.
    fn get_or_create(&self, id: &str) -> Session;

    /// Remove a session by ID.
    fn remove(&self, id: &str) -> Option<Session>;

    /// Number of stored sessions.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored session IDs, in no particular order.
    fn list_ids(&self) -> Vec<String>;
}

/// Process-lifetime store for sessions.
///
/// Never evicts and has no capacity bound; everything is lost on restart.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    /// Create a new session store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversationStore for InMemorySessionStore {
    fn get(&self, id: &str) -> Option<Session> {
        let guard = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        guard.get(id).cloned()
    }

    fn get_or_create(&self, id: &str) -> Session {
        // Try read-only first
        if let Some(session) = self.get(id) {
            return session;
        }

        let mut guard = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard
            .entry(id.to_string())
            .or_insert_with(|| {
                tracing::debug!(session_id = %id, "Created new session");
                Session::new(id)
            })
            .clone()
    }

    fn remove(&self, id: &str) -> Option<Session> {
        let mut guard = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.remove(id)
    }

    fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn list_ids(&self) -> Vec<String> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}
