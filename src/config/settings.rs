use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::config::DefaultConfig;

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const WEATHER_API_KEY_VAR: &str = "WEATHER_API_KEY";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub providers: ProvidersConfig,
    pub conversation: ConversationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProvidersConfig {
    pub weather_url: String,
    pub ai_url: String,
    pub ai_model: String,
    pub max_tokens: u32,
    pub weather_timeout_secs: u64,
    pub ai_timeout_secs: u64,
    pub default_city: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConversationConfig {
    /// Number of past exchanges replayed to the AI provider
    pub context_window: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    pub use_colors: bool,
}

/// Provider API keys. Read from the environment only, never persisted.
#[derive(Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub weather_api_key: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path_static()?;

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let settings: Settings = toml::from_str(&content)
                .with_context(|| format!("Invalid config file {}", config_path.display()))?;
            Ok(settings)
        } else {
            Ok(Self::default())
        }
    }

    /// Writes the commented default config file unless one already exists.
    /// Returns the path and whether a new file was created.
    pub fn write_default_file() -> Result<(PathBuf, bool)> {
        let config_path = Self::get_config_path_static()?;

        if config_path.exists() {
            return Ok((config_path, false));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        fs::write(&config_path, DefaultConfig::create_default_config_file())
            .with_context(|| format!("Failed to write {}", config_path.display()))?;

        Ok((config_path, true))
    }

    pub fn get_config_path(&self) -> Result<PathBuf> {
        Self::get_config_path_static()
    }

    fn get_config_path_static() -> Result<PathBuf> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;

        Ok(home_dir.join(".parley").join("config.toml"))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            providers: ProvidersConfig {
                weather_url: "http://api.openweathermap.org/data/2.5/weather".to_string(),
                ai_url: "https://api.openai.com/v1/chat/completions".to_string(),
                ai_model: "gpt-3.5-turbo".to_string(),
                max_tokens: 150,
                weather_timeout_secs: 5,
                ai_timeout_secs: 10,
                default_city: "London".to_string(),
            },
            conversation: ConversationConfig { context_window: 3 },
            output: OutputConfig { use_colors: true },
        }
    }
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            openai_api_key: non_empty_var(OPENAI_API_KEY_VAR),
            weather_api_key: non_empty_var(WEATHER_API_KEY_VAR),
        }
    }

    pub fn has_openai_key(&self) -> bool {
        self.openai_api_key.is_some()
    }

    pub fn has_weather_key(&self) -> bool {
        self.weather_api_key.is_some()
    }
}

// Keys must never end up in logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<set>"))
            .field("weather_api_key", &self.weather_api_key.as_ref().map(|_| "<set>"))
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
