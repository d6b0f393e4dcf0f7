use serde::{Deserialize, Serialize};

use crate::ai::prompt::ChatMessage;

/// Replies used when no AI key is configured.
pub const MISSING_KEY_REPLIES: &[&str] = &[
    "I can answer better with an OpenAI API key.",
    "Add your OPENAI_API_KEY to unlock AI chat.",
    "AI chat unavailable without API access.",
];

/// Small talk for unmatched input when AI chat is off.
pub const SMALL_TALK_REPLIES: &[&str] = &[
    "Tell me more!",
    "That's interesting.",
    "Hmm, continue…",
    "I like where this is going.",
];

pub const UNAVAILABLE_MESSAGE: &str = "AI service unavailable.";

// ============================================================================
// Chat Completions Wire Format
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionChoice {
    pub message: ChatMessage,
}

impl CompletionResponse {
    pub fn into_first_content(self) -> Option<String> {
        self.choices.into_iter().next().map(|c| c.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_choice_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Hello!"}},
                      {"message":{"role":"assistant","content":"Other"}}]}"#;
        let response: CompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.into_first_content().as_deref(), Some("Hello!"));
    }

    #[test]
    fn test_no_choices() {
        let response: CompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(response.into_first_content(), None);
    }

    #[test]
    fn test_request_shape() {
        let messages = vec![ChatMessage {
            role: "user".to_string(),
            content: "hi".to_string(),
        }];
        let request = CompletionRequest {
            model: "gpt-3.5-turbo",
            messages: &messages,
            max_tokens: 150,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "model": "gpt-3.5-turbo",
                "messages": [{"role": "user", "content": "hi"}],
                "max_tokens": 150
            })
        );
    }
}
