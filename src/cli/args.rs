use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "parley")]
#[command(about = "Terminal chatbot for weather, time, arithmetic and AI chat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct Cli {
    /// Send a single message and exit instead of starting a conversation
    pub message: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the default config file
    Init,
    /// Show configuration
    Config,
    /// Check which providers are available
    Doctor,
    /// Show version information
    Version,
}
