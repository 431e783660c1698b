use serde::{Deserialize, Serialize};

use crate::geocoder::{MapboxConfig, NominatimConfig};
use crate::photos::UnsplashConfig;
use crate::weather::OpenWeatherConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    pub weather: OpenWeatherConfig,
    pub photos: UnsplashConfig,
}

/// Geocoder configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeocoderConfig {
    /// Which backend resolves search queries
    pub backend: GeocoderBackend,
    /// Mapbox-specific configuration (required when backend = "mapbox")
    #[serde(default)]
    pub mapbox: Option<MapboxConfig>,
    /// Nominatim-specific configuration
    #[serde(default)]
    pub nominatim: Option<NominatimConfig>,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            backend: GeocoderBackend::Nominatim,
            mapbox: None,
            nominatim: None,
        }
    }
}

/// Available geocoding backends
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GeocoderBackend {
    Mapbox,
    Nominatim,
}
