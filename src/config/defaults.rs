pub struct DefaultConfig;

impl DefaultConfig {
    pub fn create_default_config_file() -> String {
        r#"# API keys are read from OPENAI_API_KEY and WEATHER_API_KEY, not from this file.

[providers]
weather_url = "http://api.openweathermap.org/data/2.5/weather"
ai_url = "https://api.openai.com/v1/chat/completions"
ai_model = "gpt-3.5-turbo"
max_tokens = 150
weather_timeout_secs = 5
ai_timeout_secs = 10
default_city = "London"

[conversation]
# Past exchanges sent to the AI provider, 0 to 3
context_window = 3

[output]
use_colors = true
"#
        .to_string()
    }
}
