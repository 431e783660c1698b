//! OpenWeatherMap API client.
//!
//! Uses the `/data/2.5/weather` current-conditions endpoint with metric
//! units by default. Requires an API key.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CurrentWeather, WeatherError};
use crate::metrics;

/// OpenWeatherMap configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenWeatherConfig {
    /// OpenWeatherMap API key (required).
    pub api_key: String,
    /// Base URL (default: https://api.openweathermap.org/data/2.5).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Units system: "metric", "imperial" or "standard" (default: metric).
    #[serde(default = "default_units")]
    pub units: String,
}

fn default_units() -> String {
    "metric".to_string()
}

/// OpenWeatherMap client.
pub struct OpenWeatherProvider {
    client: Client,
    base_url: String,
    api_key: String,
    units: String,
}

impl OpenWeatherProvider {
    /// Create a new OpenWeatherMap provider.
    pub fn new(config: OpenWeatherConfig) -> Result<Self, WeatherError> {
        if config.api_key.is_empty() {
            return Err(WeatherError::NotConfigured(
                "OpenWeatherMap API key is required".to_string(),
            ));
        }

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://api.openweathermap.org/data/2.5".to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
            units: config.units,
        })
    }
}

#[async_trait::async_trait]
impl super::WeatherProvider for OpenWeatherProvider {
    fn name(&self) -> &str {
        "openweathermap"
    }

    async fn current_weather(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<CurrentWeather, WeatherError> {
        let url = format!("{}/weather", self.base_url);

        debug!("OpenWeatherMap current: lat={}, lon={}", lat, lon);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("units", self.units.clone()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .inspect_err(|_| metrics::record_provider_request("openweathermap", "current", "error"))?;

        let status = response.status();
        if status == 401 {
            metrics::record_provider_request("openweathermap", "current", "error");
            return Err(WeatherError::NotConfigured(
                "Invalid OpenWeatherMap API key".to_string(),
            ));
        }
        if status == 429 {
            metrics::record_provider_request("openweathermap", "current", "error");
            return Err(WeatherError::RateLimited);
        }
        if !status.is_success() {
            metrics::record_provider_request("openweathermap", "current", "error");
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let payload: WeatherResponse = response.json().await.map_err(|e| {
            WeatherError::Parse(format!("Failed to parse weather response: {}", e))
        })?;

        metrics::record_provider_request("openweathermap", "current", "success");

        CurrentWeather::try_from(payload)
    }
}

// ============================================================================
// OpenWeatherMap API response types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    #[serde(default)]
    weather: Vec<Condition>,
    main: MainReadings,
    wind: Option<Wind>,
    /// Observation time as a unix timestamp.
    dt: i64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

impl TryFrom<WeatherResponse> for CurrentWeather {
    type Error = WeatherError;

    fn try_from(r: WeatherResponse) -> Result<Self, WeatherError> {
        let condition = r
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Parse("Response carried no conditions".to_string()))?;

        let observed_at = DateTime::<Utc>::from_timestamp(r.dt, 0)
            .ok_or_else(|| WeatherError::Parse(format!("Invalid observation time: {}", r.dt)))?;

        Ok(Self {
            description: condition.description,
            icon_code: condition.icon,
            temperature: r.main.temp,
            feels_like: r.main.feels_like,
            humidity: r.main.humidity,
            wind_speed: r.wind.map(|w| w.speed).unwrap_or(0.0),
            observed_at,
        })
    }
}
