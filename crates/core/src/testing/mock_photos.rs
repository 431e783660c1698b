//! Mock photo provider for testing.

use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Duration;

use crate::photos::{Photo, PhotoError, PhotoProvider};

/// Mock implementation of the PhotoProvider trait.
pub struct MockPhotoProvider {
    /// Photos to return for every search (defaults to empty, which is a
    /// valid result).
    results: Arc<RwLock<Vec<Photo>>>,
    /// Recorded place-name queries.
    queries: Arc<RwLock<Vec<String>>>,
    /// If set, the next call will fail with this error.
    next_error: Arc<RwLock<Option<PhotoError>>>,
    /// Artificial latency applied to every call.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockPhotoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPhotoProvider {
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(Vec::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the photos to return.
    pub async fn set_results(&self, results: Vec<Photo>) {
        *self.results.write().await = results;
    }

    /// Get recorded queries.
    pub async fn recorded_queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: PhotoError) {
        *self.next_error.write().await = Some(error);
    }

    /// Add artificial latency to every call.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }
}

#[async_trait::async_trait]
impl PhotoProvider for MockPhotoProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search_photos(&self, place_name: &str) -> Result<Vec<Photo>, PhotoError> {
        self.queries.write().await.push(place_name.to_string());

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        Ok(self.results.read().await.clone())
    }
}
