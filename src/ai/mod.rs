pub mod chat_client;
pub mod prompt;
pub mod response;

pub use chat_client::ChatClient;
pub use prompt::{ChatMessage, PromptBuilder};
pub use response::{MISSING_KEY_REPLIES, SMALL_TALK_REPLIES, UNAVAILABLE_MESSAGE};
