//! Prompt composition.

use super::{Message, MessageRole};

/// Persona used when no `llm.system_prompt` is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are an AI Agent for Aiplonex. You speak in Marathi and English naturally.
You offer:
- AI Agent Development
- AI Chatbot Development
- Website Development
- App Development
- UI/UX Design

Your task is to:
- Be polite, friendly, and professional.
- Understand if the user is a potential client.
- Explain benefits simply.
- Offer to schedule a free consultation.";

/// Everything the model sees for one request.
///
/// Built fresh for every request and dropped once the reply is back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContext {
    /// Fixed system instruction.
    pub system_instruction: String,
    /// Prior turns of the session, oldest first.
    pub history: Vec<Message>,
    /// The message being answered.
    pub user_message: String,
}

impl PromptContext {
    #[must_use]
    pub fn new(
        system_instruction: impl Into<String>,
        history: Vec<Message>,
        user_message: impl Into<String>,
    ) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            history,
            user_message: user_message.into(),
        }
    }

    /// History followed by the new user message, in the order they are sent.
    pub fn turns(&self) -> impl Iterator<Item = (MessageRole, &str)> {
        self.history
            .iter()
            .map(|m| (m.role, m.content.as_str()))
            .chain(std::iter::once((
                MessageRole::User,
                self.user_message.as_str(),
            )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turns_end_with_user_message() {
        let ctx = PromptContext::new(
            "sys",
            vec![Message::user("Hello"), Message::assistant("Namaskar!")],
            "What do you build?",
        );

        let turns: Vec<_> = ctx.turns().collect();
        assert_eq!(
            turns,
            vec![
                (MessageRole::User, "Hello"),
                (MessageRole::Assistant, "Namaskar!"),
                (MessageRole::User, "What do you build?"),
            ]
        );
    }

    #[test]
    fn test_empty_history() {
        let ctx = PromptContext::new(DEFAULT_SYSTEM_PROMPT, Vec::new(), "hi");
        assert_eq!(ctx.turns().count(), 1);
        assert!(ctx.system_instruction.contains("Aiplonex"));
    }
}
