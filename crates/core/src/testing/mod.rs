//! Testing utilities and mock implementations.
//!
//! Mock implementations of the three external provider traits, allowing the
//! state machines to be tested without real infrastructure. Each mock can be
//! configured with canned results, one-shot errors and artificial latency
//! (driven by the tokio clock, so paused-time tests stay deterministic).

mod mock_geocoder;
mod mock_photos;
mod mock_weather;

pub use mock_geocoder::{MockGeocoder, RecordedQuery};
pub use mock_photos::MockPhotoProvider;
pub use mock_weather::MockWeatherProvider;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{TimeZone, Utc};

    use crate::photos::Photo;
    use crate::place::Place;
    use crate::weather::CurrentWeather;

    /// Create a test place with coordinates.
    pub fn place(id: &str, label: &str, lat: f64, lon: f64) -> Place {
        Place {
            id: id.to_string(),
            label: label.to_string(),
            full_label: None,
            latitude: Some(lat),
            longitude: Some(lon),
            country: None,
        }
    }

    /// London with its full label and country set.
    pub fn london() -> Place {
        Place {
            id: "test-london".to_string(),
            label: "London".to_string(),
            full_label: Some("London, United Kingdom".to_string()),
            latitude: Some(51.5074),
            longitude: Some(-0.1278),
            country: Some("United Kingdom".to_string()),
        }
    }

    /// Paris with its full label and country set.
    pub fn paris() -> Place {
        Place {
            id: "test-paris".to_string(),
            label: "Paris".to_string(),
            full_label: Some("Paris, Île-de-France, France".to_string()),
            latitude: Some(48.8566),
            longitude: Some(2.3522),
            country: Some("France".to_string()),
        }
    }

    /// A place without coordinates.
    pub fn incomplete_place(label: &str) -> Place {
        Place {
            id: format!("test-{}", label.to_lowercase()),
            label: label.to_string(),
            full_label: None,
            latitude: None,
            longitude: None,
            country: None,
        }
    }

    /// Mild conditions, for mocks that need some weather.
    pub fn mild_weather() -> CurrentWeather {
        CurrentWeather {
            description: "scattered clouds".to_string(),
            icon_code: "03d".to_string(),
            temperature: 18.5,
            feels_like: 18.0,
            humidity: 60,
            wind_speed: 3.2,
            observed_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    /// Create a test photo.
    pub fn photo(id: &str) -> Photo {
        Photo {
            id: id.to_string(),
            thumbnail_url: format!("https://images.example/{}/thumb.jpg", id),
            full_url: format!("https://images.example/{}/full.jpg", id),
            attribution_name: "Test Photographer".to_string(),
            attribution_url: Some("https://photos.example/@test".to_string()),
        }
    }
}
