//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Metadata provider lookups (cache hits, misses, failures, latency)
//! - Recommendation requests (duration, candidate and result sizes)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Metadata Gateway
// =============================================================================

/// Provider lookups by endpoint and outcome.
pub static PROVIDER_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "cinetag_provider_requests_total",
            "Metadata provider lookups",
        ),
        &["endpoint", "outcome"], // outcome: "hit", "miss", "failed"
    )
    .unwrap()
});

/// Duration of actual provider calls (cache misses only).
pub static PROVIDER_CALL_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "cinetag_provider_call_duration_seconds",
            "Duration of metadata provider calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["endpoint"],
    )
    .unwrap()
});

// =============================================================================
// Recommendation Engine
// =============================================================================

/// Recommendation request duration by result.
pub static RECOMMENDATION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "cinetag_recommendation_duration_seconds",
            "Duration of recommendation requests",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["result"], // "ok", "empty", "unavailable", "invalid"
    )
    .unwrap()
});

/// Superlist size per request.
pub static CANDIDATES_AGGREGATED: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "cinetag_candidates_aggregated",
            "Number of distinct candidates aggregated per request",
        )
        .buckets(vec![0.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0]),
        &["path"], // "tags", "discovery"
    )
    .unwrap()
});

/// Recommendations returned per request.
pub static RECOMMENDATIONS_RETURNED: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "cinetag_recommendations_returned",
            "Number of recommendations returned per request",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 20.0, 50.0, 100.0]),
        &[],
    )
    .unwrap()
});

/// Returns all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Gateway
        Box::new(PROVIDER_REQUESTS.clone()),
        Box::new(PROVIDER_CALL_DURATION.clone()),
        // Engine
        Box::new(RECOMMENDATION_DURATION.clone()),
        Box::new(CANDIDATES_AGGREGATED.clone()),
        Box::new(RECOMMENDATIONS_RETURNED.clone()),
    ]
}
