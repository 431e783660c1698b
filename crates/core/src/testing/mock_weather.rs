//! Mock weather provider for testing.

use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Duration;

use super::fixtures;
use crate::weather::{CurrentWeather, WeatherError, WeatherProvider};

/// Mock implementation of the WeatherProvider trait.
pub struct MockWeatherProvider {
    /// Conditions to return (defaults to mild weather).
    result: Arc<RwLock<CurrentWeather>>,
    /// Recorded (lat, lon) calls.
    calls: Arc<RwLock<Vec<(f64, f64)>>>,
    /// If set, the next call will fail with this error.
    next_error: Arc<RwLock<Option<WeatherError>>>,
    /// Artificial latency applied to every call.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockWeatherProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWeatherProvider {
    pub fn new() -> Self {
        Self {
            result: Arc::new(RwLock::new(fixtures::mild_weather())),
            calls: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the conditions to return.
    pub async fn set_weather(&self, weather: CurrentWeather) {
        *self.result.write().await = weather;
    }

    /// Get recorded calls.
    pub async fn recorded_calls(&self) -> Vec<(f64, f64)> {
        self.calls.read().await.clone()
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: WeatherError) {
        *self.next_error.write().await = Some(error);
    }

    /// Add artificial latency to every call.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }
}

#[async_trait::async_trait]
impl WeatherProvider for MockWeatherProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn current_weather(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<CurrentWeather, WeatherError> {
        self.calls.write().await.push((lat, lon));

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        Ok(self.result.read().await.clone())
    }
}
