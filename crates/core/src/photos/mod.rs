//! Photo search for a selected place.

mod unsplash;

pub use unsplash::{UnsplashConfig, UnsplashProvider};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A photo with attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub thumbnail_url: String,
    pub full_url: String,
    /// Photographer name, shown next to the image.
    pub attribution_name: String,
    /// Link to the photographer's profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution_url: Option<String>,
}

/// Errors that can occur while searching photos.
#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimited,

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Photo provider not configured: {0}")]
    NotConfigured(String),
}

/// Trait for photo search backends.
#[async_trait]
pub trait PhotoProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Search photos matching a place name. An empty result list is valid.
    async fn search_photos(&self, place_name: &str) -> Result<Vec<Photo>, PhotoError>;
}
