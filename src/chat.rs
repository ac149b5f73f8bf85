//! One chat exchange: resolve the session, prompt the model, record the turns.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::error::ChatError;
use crate::llm::{LlmDriver, PromptContext};
use crate::session::ConversationStore;

/// Session used when the client sends no `session_id`.
pub const DEFAULT_SESSION_ID: &str = "default_user";

/// Error text for a missing or blank message.
pub const MESSAGE_REQUIRED: &str = "Message is required";

/// Runs chat exchanges against a driver and a session store.
pub struct ChatService {
    driver: Arc<dyn LlmDriver>,
    sessions: Arc<dyn ConversationStore>,
    system_instruction: String,
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("sessions", &self.sessions)
            .field("system_instruction_len", &self.system_instruction.len())
            .finish()
    }
}

impl ChatService {
    #[must_use]
    pub fn new(
        driver: Arc<dyn LlmDriver>,
        sessions: Arc<dyn ConversationStore>,
        system_instruction: impl Into<String>,
    ) -> Self {
        Self {
            driver,
            sessions,
            system_instruction: system_instruction.into(),
        }
    }

    #[must_use]
    pub fn sessions(&self) -> &Arc<dyn ConversationStore> {
        &self.sessions
    }

    /// Answer `message` within the session `session_id`.
    ///
    /// The message is trimmed; a blank message fails before any session is
    /// touched. On upstream failure the history is left as it was.
    pub async fn send(&self, session_id: &str, message: &str) -> Result<String, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::InvalidRequest(MESSAGE_REQUIRED.to_string()));
        }

        let session = self.sessions.get_or_create(session_id);
        let _exchange = session.begin_exchange().await;

        let prompt = PromptContext::new(
            self.system_instruction.as_str(),
            session.messages(),
            message,
        );
        let history_len = prompt.history.len();
        let started = Instant::now();

        match self.driver.generate(&prompt).await {
            Ok(reply) => {
                session.record_exchange(message, reply.as_str());
                info!(
                    name: "chat.completed",
                    session_id = %session_id,
                    history_len,
                    reply_length = reply.len(),
                    elapsed_ms = started.elapsed().as_millis(),
                    "Chat exchange recorded"
                );
                Ok(reply)
            }
            Err(e) => {
                warn!(
                    name: "chat.upstream_failed",
                    session_id = %session_id,
                    history_len,
                    error = %e,
                    elapsed_ms = started.elapsed().as_millis(),
                    "Generation failed; history unchanged"
                );
                Err(e.into())
            }
        }
    }
}
