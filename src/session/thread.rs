//! A single conversation thread.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard};

use crate::llm::Message;

/// A conversation session.
///
/// Cloning is cheap; all clones share the same history. Turns are only ever
/// appended, one user/assistant pair at a time.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    /// Session key as supplied by the client.
    id: String,
    /// Conversation turns, oldest first.
    messages: RwLock<Vec<Message>>,
    /// Held for the duration of one exchange.
    exchange: Mutex<()>,
    created_at: DateTime<Utc>,
}

/// Exclusive right to run one exchange on a session.
///
/// Released on drop.
#[derive(Debug)]
pub struct ExchangeGuard<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl Session {
    /// Create an empty session with the given ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                id: id.into(),
                messages: RwLock::new(Vec::new()),
                exchange: Mutex::new(()),
                created_at: Utc::now(),
            }),
        }
    }

    /// Get the session ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    /// Wait until no other exchange is running on this session.
    ///
    /// Hold the guard from reading the history until the exchange is
    /// recorded so that each prompt sees every earlier turn.
    pub async fn begin_exchange(&self) -> ExchangeGuard<'_> {
        ExchangeGuard {
            _guard: self.inner.exchange.lock().await,
        }
    }

    /// Append a completed exchange: the user turn, then the reply.
    ///
    /// Both turns land under a single write lock.
    pub fn record_exchange(&self, user: impl Into<String>, reply: impl Into<String>) {
        let mut guard = self
            .inner
            .messages
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.push(Message::user(user));
        guard.push(Message::assistant(reply));
    }

    /// Snapshot of all turns, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.inner
            .messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Get the number of turns in the conversation.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.inner
            .messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether two handles point at the same session.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
