pub mod ai;
pub mod cli;
pub mod config;
pub mod context;
pub mod intent;
pub mod router;
pub mod services;
pub mod utils;

pub use cli::{Cli, CommandHandler, Commands};
pub use config::{Credentials, Settings};
pub use context::{ConversationStore, Exchange};
pub use intent::{Intent, IntentClassifier};
pub use router::Router;
