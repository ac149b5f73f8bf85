//! Session and conversation thread management.
//!
//! Sessions live in process memory, keyed by the client-supplied session ID,
//! and hold the ordered user/assistant turns of one conversation.
//!
//! # Architecture
//!
//! - [`Session`]: A single conversation and its exchange lock
//! - [`ConversationStore`]: Keyed storage interface used by the handlers
//! - [`InMemorySessionStore`]: Default store; no eviction, no persistence
//!
//! # Example
//!
//! ```rust
//! use aiplonex_agent::session::{ConversationStore, InMemorySessionStore};
//!
//! let store = InMemorySessionStore::new();
//! let session = store.get_or_create("u1");
//! session.record_exchange("Hello!", "Namaskar!");
//!
//! assert_eq!(store.get("u1").unwrap().messages().len(), 2);
//! ```

mod store;
mod thread;

pub use store::{ConversationStore, InMemorySessionStore};
pub use thread::{ExchangeGuard, Session};
