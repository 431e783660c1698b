//! Current-weather lookup for a selected place.

mod openweather;

pub use openweather::{OpenWeatherConfig, OpenWeatherProvider};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current weather conditions at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Human-readable condition, e.g. "light rain".
    pub description: String,
    /// Provider icon code, e.g. "10d".
    pub icon_code: String,
    /// Temperature in the configured units (metric by default).
    pub temperature: f64,
    pub feels_like: f64,
    /// Relative humidity in percent.
    pub humidity: u8,
    /// Wind speed in the configured units.
    pub wind_speed: f64,
    /// When the observation was taken.
    pub observed_at: DateTime<Utc>,
}

/// Errors that can occur while fetching weather.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimited,

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Weather provider not configured: {0}")]
    NotConfigured(String),
}

/// Trait for weather backends.
///
/// Valid coordinates are a precondition: the detail panel never calls a
/// provider for an incomplete place.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Fetch current conditions at the given coordinates.
    async fn current_weather(&self, lat: f64, lon: f64)
        -> Result<CurrentWeather, WeatherError>;
}
