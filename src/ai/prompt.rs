use serde::{Deserialize, Serialize};

use crate::context::Exchange;

pub const SYSTEM_PREAMBLE: &str = "You are a helpful assistant.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

pub struct PromptBuilder;

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// System preamble, then each past exchange as a user/assistant pair,
    /// then the new input.
    pub fn build_messages(&self, user_input: &str, history: &[Exchange]) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() * 2 + 2);
        messages.push(ChatMessage::new("system", SYSTEM_PREAMBLE));

        for exchange in history {
            messages.push(ChatMessage::new("user", exchange.user_text()));
            messages.push(ChatMessage::new("assistant", exchange.bot_text()));
        }

        messages.push(ChatMessage::new("user", user_input));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ConversationStore;

    #[test]
    fn test_messages_without_history() {
        let messages = PromptBuilder::new().build_messages("hi", &[]);
        assert_eq!(
            messages,
            vec![
                ChatMessage::new("system", SYSTEM_PREAMBLE),
                ChatMessage::new("user", "hi"),
            ]
        );
    }

    #[test]
    fn test_messages_interleave_history() {
        let mut store = ConversationStore::new();
        store.record("first question", "first answer");
        store.record("second question", "second answer");

        let messages = PromptBuilder::new().build_messages("third", store.recent(3));
        let rendered: Vec<(&str, &str)> = messages
            .iter()
            .map(|m| (m.role.as_str(), m.content.as_str()))
            .collect();

        assert_eq!(
            rendered,
            vec![
                ("system", SYSTEM_PREAMBLE),
                ("user", "first question"),
                ("assistant", "first answer"),
                ("user", "second question"),
                ("assistant", "second answer"),
                ("user", "third"),
            ]
        );
    }
}
