use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::config::Settings;

pub const MISSING_KEY_MESSAGE: &str =
    "Weather service unavailable. Add WEATHER_API_KEY to enable weather lookup.";
pub const FETCH_FAILED_MESSAGE: &str = "Could not fetch weather. Check city name.";

const CITY_PREPOSITIONS: &[&str] = &["in", "at", "for"];

// ============================================================================
// Provider Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    weather: Vec<WeatherCondition>,
    main: MainReadings,
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    // Kept as a JSON number so `15` and `15.2` render the way the provider sent them
    temp: serde_json::Number,
}

pub struct WeatherClient {
    base_url: Url,
    api_key: Option<String>,
    timeout: Duration,
}

impl WeatherClient {
    pub fn new(settings: &Settings, api_key: Option<String>) -> Result<Self> {
        let base_url =
            Url::parse(&settings.providers.weather_url).context("Invalid weather provider URL")?;

        Ok(Self {
            base_url,
            api_key,
            timeout: Duration::from_secs(settings.providers.weather_timeout_secs),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Looks up current conditions for `city`. Never fails; problems come back
    /// as a readable reply.
    pub async fn get_weather(&self, city: &str) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            return MISSING_KEY_MESSAGE.to_string();
        };

        match self.fetch(city, api_key).await {
            Ok(Some(report)) => report,
            Ok(None) => FETCH_FAILED_MESSAGE.to_string(),
            Err(e) => {
                warn!("Weather lookup for {city} failed: {e:#}");
                format!("Weather service error: {e:#}")
            }
        }
    }

    /// `Ok(None)` when the provider answered with a non-200 status.
    async fn fetch(&self, city: &str, api_key: &str) -> Result<Option<String>> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        debug!("Requesting weather for {city}");

        let response = client
            .get(self.base_url.clone())
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            .context("Failed to reach weather service")?;

        if response.status() != StatusCode::OK {
            debug!("Weather service returned {}", response.status());
            return Ok(None);
        }

        let body: WeatherResponse = response
            .json()
            .await
            .context("Failed to parse weather response")?;

        let description = body
            .weather
            .first()
            .map(|w| w.description.as_str())
            .ok_or_else(|| anyhow::anyhow!("Weather response had no conditions"))?;

        Ok(Some(format!(
            "Weather in {city}: {description}, {}°C",
            body.main.temp
        )))
    }
}

/// Picks the city out of free text: the token after the last "in", "at" or
/// "for". Trailing punctuation is dropped so "in Paris?" gives "Paris".
pub fn extract_city<'a>(text: &'a str, default_city: &'a str) -> &'a str {
    let words: Vec<&str> = text.split_whitespace().collect();

    words
        .windows(2)
        .filter(|pair| {
            CITY_PREPOSITIONS
                .iter()
                .any(|p| pair[0].eq_ignore_ascii_case(p))
        })
        .map(|pair| pair[1].trim_end_matches(|c: char| c.is_ascii_punctuation()))
        .filter(|city| !city.is_empty())
        .last()
        .unwrap_or(default_city)
}
