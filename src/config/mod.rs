pub mod defaults;
pub mod settings;

pub use defaults::DefaultConfig;
pub use settings::{Credentials, Settings, OPENAI_API_KEY_VAR, WEATHER_API_KEY_VAR};
