pub mod args;
pub mod commands;
pub mod output;

pub use args::{Cli, Commands};
pub use commands::{handle_init, version_info, CommandHandler};
pub use output::OutputFormatter;
