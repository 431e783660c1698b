use super::{types::Config, ConfigError};
use crate::config::GeocoderBackend;

/// Validate configuration
///
/// Checks that the selected geocoder backend has its section and that every
/// required credential is present and non-empty, so a missing key surfaces
/// here instead of as a failed request later.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    match config.geocoder.backend {
        GeocoderBackend::Mapbox => match &config.geocoder.mapbox {
            Some(mapbox) if !mapbox.access_token.is_empty() => {}
            _ => return Err(ConfigError::MissingKey("mapbox")),
        },
        // Nominatim needs no key; the default section is enough.
        GeocoderBackend::Nominatim => {}
    }

    if config.weather.api_key.is_empty() {
        return Err(ConfigError::MissingKey("openweathermap"));
    }

    if config.photos.access_key.is_empty() {
        return Err(ConfigError::MissingKey("unsplash"));
    }

    Ok(())
}
