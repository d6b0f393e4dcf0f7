use anyhow::Result;
use clap::Parser;
use log::error;
use std::io;

use parley::cli::{handle_init, version_info, OutputFormatter};
use parley::{Cli, CommandHandler, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Only errors unless asked for more; RUST_LOG still wins
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Error
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    // These must work even when the config file is broken
    match cli.command {
        Some(Commands::Version) => {
            println!("{}", version_info());
            return Ok(());
        }
        Some(Commands::Init) => {
            let formatter = OutputFormatter::new(!cli.no_color);
            match handle_init(&formatter) {
                Ok(output) => println!("{output}"),
                Err(e) => {
                    error!("Init failed: {e:#}");
                    eprintln!("{}", formatter.format_error(&format!("{e:#}")));
                    std::process::exit(1);
                }
            }
            return Ok(());
        }
        _ => {}
    }

    let handler = match CommandHandler::new(cli.no_color) {
        Ok(h) => h,
        Err(e) => {
            error!("Failed to initialize Parley: {e:#}");
            eprintln!("Error: Failed to initialize Parley: {e:#}");
            eprintln!("Fix or remove ~/.parley/config.toml, or run 'parley init'.");
            std::process::exit(1);
        }
    };

    match (cli.command, cli.message) {
        (Some(command), _) => match handler.handle_command(command) {
            Ok(output) => println!("{output}"),
            Err(e) => {
                error!("Command failed: {e:#}");
                eprintln!("{}", handler.format_error(&format!("{e:#}")));
                std::process::exit(1);
            }
        },
        (None, Some(message)) => {
            println!("{}", handler.handle_message(&message).await);
        }
        (None, None) => {
            let stdin = io::stdin();
            handler.run_conversation(stdin.lock(), io::stdout()).await?;
        }
    }

    Ok(())
}
