use anyhow::{Context, Result};
use log::{debug, info};
use std::io::{BufRead, Write};

use crate::cli::{Commands, OutputFormatter};
use crate::config::{Credentials, Settings, OPENAI_API_KEY_VAR, WEATHER_API_KEY_VAR};
use crate::context::ConversationStore;
use crate::router::Router;

const EXIT_WORDS: &[&str] = &["quit", "exit"];

pub struct CommandHandler {
    settings: Settings,
    credentials: Credentials,
    router: Router,
    formatter: OutputFormatter,
}

impl CommandHandler {
    pub fn new(no_color: bool) -> Result<Self> {
        let settings = Settings::load()?;
        let credentials = Credentials::from_env();
        debug!("Loaded credentials: {credentials:?}");
        Self::from_parts(settings, credentials, no_color)
    }

    pub fn from_parts(settings: Settings, credentials: Credentials, no_color: bool) -> Result<Self> {
        let router = Router::new(&settings, credentials.clone())?;
        let formatter = OutputFormatter::new(settings.output.use_colors && !no_color);

        Ok(Self {
            settings,
            credentials,
            router,
            formatter,
        })
    }

    pub fn handle_command(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Init => handle_init(&self.formatter),
            Commands::Config => self.handle_config(),
            Commands::Doctor => Ok(self.handle_doctor()),
            Commands::Version => Ok(version_info()),
        }
    }

    /// Answers a single message with no conversation history.
    pub async fn handle_message(&self, message: &str) -> String {
        let reply = self
            .router
            .get_response(message.trim(), &ConversationStore::new())
            .await;
        self.formatter.format_reply(&reply)
    }

    /// Reads lines until "quit", "exit" or end of input, answering each one and
    /// recording it in the session's conversation.
    pub async fn run_conversation<R, W>(&self, input: R, mut output: W) -> Result<ConversationStore>
    where
        R: BufRead,
        W: Write,
    {
        let mut conversation = ConversationStore::new();
        let mut lines = input.lines();

        writeln!(output, "{}", self.formatter.banner())?;
        if !self.credentials.has_openai_key() || !self.credentials.has_weather_key() {
            writeln!(
                output,
                "{}",
                self.formatter.format_info(&format!(
                    "Set {OPENAI_API_KEY_VAR} and {WEATHER_API_KEY_VAR} for full features."
                ))
            )?;
        }

        loop {
            write!(output, "{}", self.formatter.user_prompt())?;
            output.flush()?;

            let Some(line) = lines.next() else {
                writeln!(output)?;
                break;
            };
            let line = line.context("Failed to read input")?;
            let user_input = line.trim();

            if EXIT_WORDS
                .iter()
                .any(|w| user_input.eq_ignore_ascii_case(w))
            {
                break;
            }
            if user_input.is_empty() {
                continue;
            }

            let reply = self.router.get_response(user_input, &conversation).await;
            writeln!(output, "{}", self.formatter.format_reply(&reply))?;
            conversation.record(user_input, &reply);
        }

        writeln!(output, "Goodbye!")?;
        let exchanges = conversation.all();
        if let (Some(first), Some(last)) = (exchanges.first(), exchanges.last()) {
            info!(
                "Conversation ended after {} exchanges over {}s",
                exchanges.len(),
                (last.timestamp() - first.timestamp()).num_seconds()
            );
        }
        Ok(conversation)
    }

    fn handle_config(&self) -> Result<String> {
        let providers = &self.settings.providers;
        Ok(format!(
            "Parley Configuration:\n\
            - Config file: {}\n\
            - Weather endpoint: {} (timeout {}s)\n\
            - AI endpoint: {} (timeout {}s)\n\
            - AI model: {} (max tokens {})\n\
            - Default city: {}\n\
            - Context window: {} exchanges\n\
            - Use colors: {}\n\
            - {}: {}\n\
            - {}: {}",
            self.settings.get_config_path()?.display(),
            providers.weather_url,
            providers.weather_timeout_secs,
            providers.ai_url,
            providers.ai_timeout_secs,
            providers.ai_model,
            providers.max_tokens,
            providers.default_city,
            self.settings.conversation.context_window,
            self.settings.output.use_colors,
            WEATHER_API_KEY_VAR,
            presence(self.credentials.has_weather_key()),
            OPENAI_API_KEY_VAR,
            presence(self.credentials.has_openai_key()),
        ))
    }

    fn handle_doctor(&self) -> String {
        let mut diagnostics = Vec::new();

        if self.credentials.has_weather_key() {
            diagnostics.push(self.formatter.format_success("Weather lookup enabled"));
        } else {
            diagnostics.push(self.formatter.format_warning(&format!(
                "Weather lookup disabled (set {WEATHER_API_KEY_VAR})"
            )));
        }

        if self.credentials.has_openai_key() {
            diagnostics.push(self.formatter.format_success("AI chat enabled"));
        } else {
            diagnostics.push(self.formatter.format_warning(&format!(
                "AI chat disabled, using canned replies (set {OPENAI_API_KEY_VAR})"
            )));
        }

        diagnostics.push(self.formatter.format_success("Time and calculator available"));

        format!("Parley Health Check:\n{}", diagnostics.join("\n"))
    }

    pub fn format_error(&self, message: &str) -> String {
        self.formatter.format_error(message)
    }
}

/// Writes the default config file. Works even when the current one is broken.
pub fn handle_init(formatter: &OutputFormatter) -> Result<String> {
    let (path, created) = Settings::write_default_file()?;
    if created {
        Ok(formatter.format_success(&format!("Wrote default config to {}", path.display())))
    } else {
        Ok(formatter.format_info(&format!("Config already exists at {}", path.display())))
    }
}

pub fn version_info() -> String {
    format!(
        "parley {}\nRust version: {}\nPlatform: {}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_RUST_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

fn presence(set: bool) -> &'static str {
    if set {
        "set"
    } else {
        "not set"
    }
}
