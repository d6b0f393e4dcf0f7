pub mod history;

pub use history::{ConversationStore, Exchange, MAX_CONTEXT_WINDOW};
