//! Mapbox geocoding API client.
//!
//! Uses the v5 forward-geocoding endpoint, which returns a GeoJSON-style
//! feature collection. Requires an access token.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::GeocodeError;
use crate::metrics;
use crate::place::Place;

/// Mapbox geocoder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapboxConfig {
    /// Mapbox access token (required).
    pub access_token: String,
    /// Base URL (default: https://api.mapbox.com/geocoding/v5/mapbox.places).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Maximum results to request (default: 5).
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    5
}

/// Mapbox geocoding client.
pub struct MapboxGeocoder {
    client: Client,
    base_url: String,
    access_token: String,
    limit: u32,
}

impl MapboxGeocoder {
    /// Create a new Mapbox geocoder.
    pub fn new(config: MapboxConfig) -> Result<Self, GeocodeError> {
        if config.access_token.is_empty() {
            return Err(GeocodeError::NotConfigured(
                "Mapbox access token is required".to_string(),
            ));
        }

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        let base_url = config.base_url.unwrap_or_else(|| {
            "https://api.mapbox.com/geocoding/v5/mapbox.places".to_string()
        });

        Ok(Self {
            client,
            base_url,
            access_token: config.access_token,
            limit: config.limit,
        })
    }
}

#[async_trait::async_trait]
impl super::Geocoder for MapboxGeocoder {
    fn name(&self) -> &str {
        "mapbox"
    }

    async fn search(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }

        let url = format!("{}/{}.json", self.base_url, urlencoding::encode(query));

        debug!("Mapbox geocode: query='{}'", query);

        let limit = self.limit.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("access_token", self.access_token.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .inspect_err(|_| metrics::record_provider_request("mapbox", "search", "error"))?;

        let status = response.status();
        if status == 401 {
            metrics::record_provider_request("mapbox", "search", "error");
            return Err(GeocodeError::NotConfigured(
                "Invalid Mapbox access token".to_string(),
            ));
        }
        if status == 429 {
            metrics::record_provider_request("mapbox", "search", "error");
            return Err(GeocodeError::RateLimited);
        }
        if !status.is_success() {
            metrics::record_provider_request("mapbox", "search", "error");
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let collection: FeatureCollection = response.json().await.map_err(|e| {
            GeocodeError::Parse(format!("Failed to parse geocoding response: {}", e))
        })?;

        metrics::record_provider_request("mapbox", "search", "success");

        Ok(collection.features.into_iter().map(Place::from).collect())
    }
}

// ============================================================================
// Mapbox API response types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    id: String,
    /// Short name of the feature, e.g. "Paris".
    text: String,
    /// Full display string, e.g. "Paris, Île-de-France, France".
    place_name: Option<String>,
    /// [longitude, latitude]. Missing or short arrays leave the place
    /// incomplete rather than failing the whole response.
    #[serde(default)]
    center: Vec<f64>,
    #[serde(default)]
    context: Vec<ContextEntry>,
}

#[derive(Debug, Deserialize)]
struct ContextEntry {
    id: String,
    text: String,
}

impl From<Feature> for Place {
    fn from(f: Feature) -> Self {
        // Mapbox orders center as [lon, lat].
        let (longitude, latitude) = match f.center.as_slice() {
            [lon, lat, ..] => (Some(*lon), Some(*lat)),
            _ => (None, None),
        };

        let country = f
            .context
            .iter()
            .find(|c| c.id.starts_with("country"))
            .map(|c| c.text.clone());

        Self {
            id: f.id,
            label: f.text,
            full_label: f.place_name,
            latitude,
            longitude,
            country,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_conversion() {
        let json = r#"{
            "features": [{
                "id": "place.12345",
                "text": "Paris",
                "place_name": "Paris, Île-de-France, France",
                "center": [2.3522, 48.8566],
                "context": [
                    {"id": "region.678", "text": "Île-de-France"},
                    {"id": "country.910", "text": "France"}
                ]
            }]
        }"#;

        let collection: FeatureCollection = serde_json::from_str(json).unwrap();
        let place: Place = collection.features.into_iter().next().unwrap().into();

        assert_eq!(place.id, "place.12345");
        assert_eq!(place.label, "Paris");
        assert_eq!(
            place.full_label.as_deref(),
            Some("Paris, Île-de-France, France")
        );
        assert_eq!(place.latitude, Some(48.8566));
        assert_eq!(place.longitude, Some(2.3522));
        assert_eq!(place.country.as_deref(), Some("France"));
    }

    #[test]
    fn test_feature_without_center_is_incomplete() {
        let json = r#"{
            "features": [{"id": "place.1", "text": "Nowhere"}]
        }"#;

        let collection: FeatureCollection = serde_json::from_str(json).unwrap();
        let place: Place = collection.features.into_iter().next().unwrap().into();

        assert!(place.coordinates().is_none());
        assert!(place.country.is_none());
        assert_eq!(place.display_name(), "Nowhere");
    }

    #[test]
    fn test_empty_feature_collection() {
        let collection: FeatureCollection = serde_json::from_str(r#"{"features": []}"#).unwrap();
        assert!(collection.features.is_empty());
    }

    #[test]
    fn test_new_rejects_empty_token() {
        let result = MapboxGeocoder::new(MapboxConfig {
            access_token: String::new(),
            base_url: None,
            limit: 5,
        });
        assert!(matches!(result, Err(GeocodeError::NotConfigured(_))));
    }
}
