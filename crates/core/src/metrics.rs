//! Prometheus metrics for core components.
//!
//! Covers the query controller (requests, stale drops, candidate counts)
//! and the external providers (per-service request counters).

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts};

/// Geocode requests issued by the query controller, by result.
pub static SEARCH_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "wayfarer_search_requests_total",
            "Geocode requests issued by the query controller",
        ),
        &["result"], // "ok", "error"
    )
    .unwrap()
});

/// Responses discarded because a newer request or selection superseded them.
pub static STALE_RESPONSES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "wayfarer_stale_responses_total",
            "Responses dropped because they were superseded",
        ),
        &["component"], // "search", "weather", "photos"
    )
    .unwrap()
});

/// Candidates returned per accepted geocode response.
pub static CANDIDATES_RETURNED: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "wayfarer_candidates_returned",
            "Candidates in each accepted geocode response",
        )
        .buckets(vec![0.0, 1.0, 2.0, 3.0, 5.0, 10.0]),
    )
    .unwrap()
});

/// External provider requests by service, operation and status.
pub static PROVIDER_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "wayfarer_provider_requests_total",
            "Total external provider requests",
        ),
        &["service", "operation", "status"], // status: "success", "error"
    )
    .unwrap()
});

/// Record an external provider request outcome.
pub fn record_provider_request(service: &str, operation: &str, status: &str) {
    PROVIDER_REQUESTS
        .with_label_values(&[service, operation, status])
        .inc();
}

/// Record that a superseded response was dropped.
pub fn record_stale_response(component: &str) {
    STALE_RESPONSES.with_label_values(&[component]).inc();
}

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SEARCH_REQUESTS.clone()),
        Box::new(STALE_RESPONSES.clone()),
        Box::new(CANDIDATES_RETURNED.clone()),
        Box::new(PROVIDER_REQUESTS.clone()),
    ]
}
