//! Session wiring: from configuration to a running component graph.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::{validate_config, Config, ConfigError, GeocoderBackend};
use crate::detail::DetailPanel;
use crate::geocoder::{Geocoder, MapboxGeocoder, NominatimGeocoder};
use crate::notify::{Notice, NotificationHandle};
use crate::photos::{PhotoProvider, UnsplashProvider};
use crate::search::{QueryController, QueryOptions};
use crate::selection::SelectionState;
use crate::weather::{OpenWeatherProvider, WeatherProvider};

/// A wired-up exploration session: search box, selection and detail panel
/// sharing one selection state and one notification channel.
///
/// The rendering layer drains the returned [`Notice`] receiver and renders
/// from the watch channels the components expose.
pub struct ExploreSession {
    pub search: QueryController,
    pub selection: SelectionState,
    pub details: DetailPanel,
}

impl ExploreSession {
    /// Build a session from validated configuration.
    pub fn from_config(config: &Config) -> Result<(Self, mpsc::Receiver<Notice>), ConfigError> {
        validate_config(config)?;

        let geocoder: Arc<dyn Geocoder> = match config.geocoder.backend {
            GeocoderBackend::Mapbox => {
                // Validation guarantees the section is present.
                let mapbox = config
                    .geocoder
                    .mapbox
                    .clone()
                    .ok_or(ConfigError::MissingKey("mapbox"))?;
                Arc::new(MapboxGeocoder::new(mapbox).map_err(|e| ConfigError::ProviderInit {
                    provider: "mapbox",
                    message: e.to_string(),
                })?)
            }
            GeocoderBackend::Nominatim => {
                let nominatim = config.geocoder.nominatim.clone().unwrap_or_default();
                Arc::new(NominatimGeocoder::new(nominatim).map_err(|e| {
                    ConfigError::ProviderInit {
                        provider: "nominatim",
                        message: e.to_string(),
                    }
                })?)
            }
        };

        let weather: Arc<dyn WeatherProvider> = Arc::new(
            OpenWeatherProvider::new(config.weather.clone()).map_err(|e| {
                ConfigError::ProviderInit {
                    provider: "openweathermap",
                    message: e.to_string(),
                }
            })?,
        );

        let photos: Arc<dyn PhotoProvider> =
            Arc::new(UnsplashProvider::new(config.photos.clone()).map_err(|e| {
                ConfigError::ProviderInit {
                    provider: "unsplash",
                    message: e.to_string(),
                }
            })?);

        Ok(Self::new(geocoder, weather, photos, QueryOptions::default()))
    }

    /// Build a session from already-constructed providers.
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        weather: Arc<dyn WeatherProvider>,
        photos: Arc<dyn PhotoProvider>,
        options: QueryOptions,
    ) -> (Self, mpsc::Receiver<Notice>) {
        let (notices, notice_rx) = NotificationHandle::channel(64);
        let selection = SelectionState::new();
        let search =
            QueryController::new(geocoder, selection.clone(), notices.clone(), options);
        let details = DetailPanel::new(weather, photos, notices);
        details.watch_selection(&selection);

        (
            Self {
                search,
                selection,
                details,
            },
            notice_rx,
        )
    }

    /// Seed the session with the default selection.
    pub fn bootstrap(&self) {
        self.selection.bootstrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    #[tokio::test]
    async fn test_from_config_with_nominatim_defaults() {
        let config = load_config_from_str(
            r#"
[weather]
api_key = "owm-key"

[photos]
access_key = "unsplash-key"
"#,
        )
        .unwrap();

        let result = ExploreSession::from_config(&config);
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_from_config_rejects_missing_keys() {
        let config = load_config_from_str(
            r#"
[weather]
api_key = ""

[photos]
access_key = "unsplash-key"
"#,
        )
        .unwrap();

        assert!(matches!(
            ExploreSession::from_config(&config),
            Err(ConfigError::MissingKey("openweathermap"))
        ));
    }
}
