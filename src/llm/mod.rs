//! LLM driver trait and the Gemini implementation.
//!
//! The request handler only depends on [`LlmDriver`]: it hands over a fully
//! composed [`PromptContext`] and receives the reply text or a
//! [`GenerationError`](crate::error::GenerationError).
//!
//! # Drivers
//!
//! - [`GeminiDriver`]: Google Generative Language API (`:generateContent`)
//!
//! # Example
//!
//! ```rust,ignore
//! use aiplonex_agent::llm::{GeminiDriver, LlmSettings};
//!
//! let settings = LlmSettings {
//!     base_url: "https://generativelanguage.googleapis.com".to_string(),
//!     api_key: "AIza...".to_string(),
//!     model: "models/gemini-1.5-flash".to_string(),
//!     temperature: 0.7,
//!     max_output_tokens: None,
//! };
//! let driver = GeminiDriver::new(settings);
//! ```

pub mod gemini;
pub mod prompt;

pub use gemini::GeminiDriver;
pub use prompt::{DEFAULT_SYSTEM_PROMPT, PromptContext};

use crate::error::GenerationError;

/// LLM connection and model settings.
#[derive(Clone)]
pub struct LlmSettings {
    /// Base URL for the API (e.g., `https://generativelanguage.googleapis.com`).
    pub base_url: String,
    /// API key sent with every request.
    pub api_key: String,
    /// Model identifier, with or without the `models/` prefix.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Optional cap on generated tokens.
    pub max_output_tokens: Option<u32>,
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

/// A single turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    /// Role of the message author.
    pub role: MessageRole,
    /// Text of the turn.
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message sent by the client.
    User,
    /// Reply produced by the model.
    Assistant,
}

impl MessageRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// Trait for text generation backends.
///
/// Implementations run one request to completion; they never retry and never
/// touch conversation state.
#[async_trait::async_trait]
pub trait LlmDriver: Send + Sync {
    /// Generate a reply for the composed prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response carries no text.
    async fn generate(&self, prompt: &PromptContext) -> Result<String, GenerationError>;
}
