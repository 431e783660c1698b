//! Mock geocoder for testing.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};

use crate::geocoder::{GeocodeError, Geocoder};
use crate::place::Place;

/// A recorded search for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedQuery {
    /// The query that was searched.
    pub query: String,
    /// When the search was made.
    pub timestamp: Instant,
}

/// A query handler that produces results dynamically based on the query.
type QueryHandler = Box<dyn Fn(&str) -> Option<Vec<Place>> + Send + Sync>;

/// Mock implementation of the Geocoder trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable candidate lists
/// - Track queries for assertions
/// - Simulate failures and per-query latency (via the tokio clock, so
///   paused-time tests control response ordering deterministically)
pub struct MockGeocoder {
    /// Configured results, filtered by query substring unless a handler
    /// is set.
    results: Arc<RwLock<Vec<Place>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedQuery>>>,
    /// If set, the next search will fail with this error.
    next_error: Arc<RwLock<Option<GeocodeError>>>,
    /// Artificial latency per exact query string.
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    /// Query handler for dynamic result generation.
    handler: Arc<RwLock<Option<QueryHandler>>>,
}

impl Default for MockGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGeocoder {
    /// Create a new mock geocoder with empty results.
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(Vec::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            delays: Arc::new(RwLock::new(HashMap::new())),
            handler: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the results to return for subsequent searches.
    pub async fn set_results(&self, results: Vec<Place>) {
        *self.results.write().await = results;
    }

    /// Get recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedQuery> {
        self.queries.read().await.clone()
    }

    /// Get the number of searches performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_error(&self, error: GeocodeError) {
        *self.next_error.write().await = Some(error);
    }

    /// Add artificial latency for an exact query string.
    pub async fn set_delay(&self, query: &str, delay: Duration) {
        self.delays.write().await.insert(query.to_string(), delay);
    }

    /// Set a handler that generates results per query, overriding the
    /// configured result list.
    pub async fn set_query_handler<F>(&self, handler: F)
    where
        F: Fn(&str) -> Option<Vec<Place>> + Send + Sync + 'static,
    {
        *self.handler.write().await = Some(Box::new(handler));
    }
}

#[async_trait::async_trait]
impl Geocoder for MockGeocoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
        // Record the query at issue time, before any artificial latency.
        self.queries.write().await.push(RecordedQuery {
            query: query.to_string(),
            timestamp: Instant::now(),
        });

        let delay = self.delays.read().await.get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let handler = self.handler.read().await;
        if let Some(ref h) = *handler {
            if let Some(results) = h(query) {
                return Ok(results);
            }
        }
        drop(handler);

        // Default: filter configured results by case-insensitive substring
        // match on label or full label.
        let query_lower = query.to_lowercase();
        let results = self.results.read().await;
        Ok(results
            .iter()
            .filter(|p| {
                p.label.to_lowercase().contains(&query_lower)
                    || p.full_label
                        .as_ref()
                        .is_some_and(|f| f.to_lowercase().contains(&query_lower))
            })
            .cloned()
            .collect())
    }
}
