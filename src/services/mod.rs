pub mod calculator;
pub mod clock;
pub mod weather;

pub use weather::{extract_city, WeatherClient};
