//! Nominatim (OpenStreetMap) geocoding client.
//!
//! Nominatim needs no API key but its usage policy requires an identifying
//! User-Agent. Coordinates arrive as strings; a value that fails to parse
//! produces an incomplete place rather than failing the response.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::GeocodeError;
use crate::metrics;
use crate::place::Place;

/// Nominatim geocoder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Base URL (default: https://nominatim.openstreetmap.org).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// User-Agent sent with every request (required by the usage policy).
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Maximum results to request (default: 5).
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            user_agent: default_user_agent(),
            limit: default_limit(),
        }
    }
}

fn default_user_agent() -> String {
    concat!("wayfarer/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_limit() -> u32 {
    5
}

/// Nominatim geocoding client.
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
    limit: u32,
}

impl NominatimGeocoder {
    /// Create a new Nominatim geocoder.
    pub fn new(config: NominatimConfig) -> Result<Self, GeocodeError> {
        if config.user_agent.is_empty() {
            return Err(GeocodeError::NotConfigured(
                "Nominatim requires a User-Agent".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(config.user_agent)
            .build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://nominatim.openstreetmap.org".to_string());

        Ok(Self {
            client,
            base_url,
            limit: config.limit,
        })
    }
}

#[async_trait::async_trait]
impl super::Geocoder for NominatimGeocoder {
    fn name(&self) -> &str {
        "nominatim"
    }

    async fn search(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }

        let url = format!("{}/search", self.base_url);

        debug!("Nominatim geocode: query='{}'", query);

        let limit = self.limit.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("addressdetails", "1"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .inspect_err(|_| metrics::record_provider_request("nominatim", "search", "error"))?;

        let status = response.status();
        if status == 429 {
            metrics::record_provider_request("nominatim", "search", "error");
            return Err(GeocodeError::RateLimited);
        }
        if !status.is_success() {
            metrics::record_provider_request("nominatim", "search", "error");
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let records: Vec<NominatimRecord> = response.json().await.map_err(|e| {
            GeocodeError::Parse(format!("Failed to parse search response: {}", e))
        })?;

        metrics::record_provider_request("nominatim", "search", "success");

        Ok(records.into_iter().map(Place::from).collect())
    }
}

// ============================================================================
// Nominatim API response types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct NominatimRecord {
    place_id: u64,
    display_name: String,
    /// Short name; absent on some record types.
    name: Option<String>,
    lat: Option<String>,
    lon: Option<String>,
    #[serde(default)]
    address: NominatimAddress,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    country: Option<String>,
}

impl From<NominatimRecord> for Place {
    fn from(r: NominatimRecord) -> Self {
        let label = match r.name {
            Some(name) if !name.is_empty() => name,
            // Fall back to the first comma-separated segment of the
            // display name.
            _ => r
                .display_name
                .split(',')
                .next()
                .unwrap_or(&r.display_name)
                .trim()
                .to_string(),
        };

        Self {
            id: format!("osm-{}", r.place_id),
            label,
            full_label: Some(r.display_name),
            latitude: r.lat.as_deref().and_then(|v| v.parse().ok()),
            longitude: r.lon.as_deref().and_then(|v| v.parse().ok()),
            country: r.address.country,
        }
    }
}
