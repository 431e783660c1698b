//! Unsplash API client.
//!
//! Uses the `/search/photos` endpoint with `Client-ID` authorization.
//! Requires an access key; the demo tier is rate limited to 50 requests
//! per hour.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Photo, PhotoError};
use crate::metrics;

/// Unsplash configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsplashConfig {
    /// Unsplash access key (required).
    pub access_key: String,
    /// Base URL (default: https://api.unsplash.com).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Photos per search (default: 9, a 3x3 grid).
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_per_page() -> u32 {
    9
}

/// Unsplash client.
pub struct UnsplashProvider {
    client: Client,
    base_url: String,
    access_key: String,
    per_page: u32,
}

impl UnsplashProvider {
    /// Create a new Unsplash provider.
    pub fn new(config: UnsplashConfig) -> Result<Self, PhotoError> {
        if config.access_key.is_empty() {
            return Err(PhotoError::NotConfigured(
                "Unsplash access key is required".to_string(),
            ));
        }

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://api.unsplash.com".to_string());

        Ok(Self {
            client,
            base_url,
            access_key: config.access_key,
            per_page: config.per_page,
        })
    }
}

#[async_trait::async_trait]
impl super::PhotoProvider for UnsplashProvider {
    fn name(&self) -> &str {
        "unsplash"
    }

    async fn search_photos(&self, place_name: &str) -> Result<Vec<Photo>, PhotoError> {
        let url = format!("{}/search/photos", self.base_url);

        debug!("Unsplash search: query='{}'", place_name);

        let per_page = self.per_page.to_string();
        let response = self
            .client
            .get(&url)
            .header(
                "Authorization",
                format!("Client-ID {}", self.access_key),
            )
            .query(&[
                ("query", place_name),
                ("per_page", per_page.as_str()),
                ("orientation", "landscape"),
            ])
            .send()
            .await
            .inspect_err(|_| metrics::record_provider_request("unsplash", "search", "error"))?;

        let status = response.status();
        if status == 401 {
            metrics::record_provider_request("unsplash", "search", "error");
            return Err(PhotoError::NotConfigured(
                "Invalid Unsplash access key".to_string(),
            ));
        }
        if status == 403 || status == 429 {
            metrics::record_provider_request("unsplash", "search", "error");
            return Err(PhotoError::RateLimited);
        }
        if !status.is_success() {
            metrics::record_provider_request("unsplash", "search", "error");
            let body = response.text().await.unwrap_or_default();
            return Err(PhotoError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let payload: SearchResponse = response.json().await.map_err(|e| {
            PhotoError::Parse(format!("Failed to parse photo search response: {}", e))
        })?;

        metrics::record_provider_request("unsplash", "search", "success");

        Ok(payload.results.into_iter().map(Photo::from).collect())
    }
}

// ============================================================================
// Unsplash API response types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<PhotoResult>,
}

#[derive(Debug, Deserialize)]
struct PhotoResult {
    id: String,
    urls: PhotoUrls,
    user: PhotoUser,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    thumb: String,
    regular: String,
}

#[derive(Debug, Deserialize)]
struct PhotoUser {
    name: String,
    links: Option<UserLinks>,
}

#[derive(Debug, Deserialize)]
struct UserLinks {
    html: Option<String>,
}

impl From<PhotoResult> for Photo {
    fn from(r: PhotoResult) -> Self {
        Self {
            id: r.id,
            thumbnail_url: r.urls.thumb,
            full_url: r.urls.regular,
            attribution_name: r.user.name,
            attribution_url: r.user.links.and_then(|l| l.html),
        }
    }
}
