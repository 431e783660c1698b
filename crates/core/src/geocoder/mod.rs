//! Geocoding backends.
//!
//! This module provides a `Geocoder` trait for resolving free-text queries
//! into ranked [`Place`] candidates, with one client per upstream service
//! (Mapbox, Nominatim). The query controller treats both uniformly through
//! the normalized `Place` shape.

mod mapbox;
mod nominatim;

pub use mapbox::{MapboxConfig, MapboxGeocoder};
pub use nominatim::{NominatimConfig, NominatimGeocoder};

use async_trait::async_trait;
use thiserror::Error;

use crate::place::Place;

/// Errors that can occur while geocoding.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimited,

    /// API returned an error status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse the response payload.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Client not configured (missing API key, etc.).
    #[error("Geocoder not configured: {0}")]
    NotConfigured(String),

    /// The query was blank; callers must not issue requests for blank input.
    #[error("Query must not be blank")]
    EmptyQuery,
}

/// Trait for geocoding backends.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Resolve a free-text query to ranked place candidates,
    /// most relevant first.
    async fn search(&self, query: &str) -> Result<Vec<Place>, GeocodeError>;
}
