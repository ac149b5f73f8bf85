//! Aiplonex chat agent
//!
//! A small HTTP service that relays chat messages to the Gemini generative
//! language API and keeps a per-session conversation history in memory.
//!
//! # Architecture
//!
//! - **Server**: Axum HTTP routes and JSON payloads
//! - **Chat**: One exchange per request, serialized per session
//! - **LLM**: Driver trait plus the Gemini `generateContent` client
//! - **Sessions**: In-memory, never-evicted conversation store
//!
//! # Modules
//!
//! - [`chat`]: Exchange logic shared by the HTTP handlers
//! - [`config`]: Layered configuration (defaults, YAML, env, CLI)
//! - [`error`]: Error taxonomy and HTTP error rendering
//! - [`llm`]: LLM driver trait and implementations
//! - [`server`]: Router construction and startup
//! - [`session`]: Conversation and session management

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod server;
pub mod session;

use std::sync::Arc;

use chat::ChatService;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Chat exchange runner; owns the driver and the session store.
    pub chat: Arc<ChatService>,
}

impl AppState {
    #[must_use]
    pub fn new(chat: ChatService) -> Self {
        Self {
            chat: Arc::new(chat),
        }
    }
}
