//! Prometheus metrics for the HTTP surface.
//!
//! HTTP request metrics live here; engine, gateway and provider metrics
//! come from `cinetag_core::metrics` and are registered into the same
//! registry.

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "cinetag_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("cinetag_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "cinetag_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Engine, gateway and provider metrics
    for metric in cinetag_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Normalize a path for metric labels (numeric ids become `{id}`).
pub fn normalize_path(path: &str) -> String {
    static NUMERIC: Lazy<regex_lite::Regex> =
        Lazy::new(|| regex_lite::Regex::new(r"/\d+(/|$)").unwrap());

    // Applied twice: adjacent numeric segments share a slash.
    let once = NUMERIC.replace_all(path, "/{id}$1");
    NUMERIC.replace_all(&once, "/{id}$1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_numeric() {
        assert_eq!(normalize_path("/api/v1/movies/603"), "/api/v1/movies/{id}");
    }

    #[test]
    fn test_normalize_path_numeric_middle() {
        assert_eq!(
            normalize_path("/api/v1/movies/603/similar/2"),
            "/api/v1/movies/{id}/similar/{id}"
        );
    }

    #[test]
    fn test_normalize_path_no_ids() {
        assert_eq!(
            normalize_path("/api/v1/recommendations/tag-based"),
            "/api/v1/recommendations/tag-based"
        );
    }

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();

        let output = encode_metrics();
        assert!(output.contains("cinetag_http_requests_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_contains_core_metrics() {
        cinetag_core::metrics::RECOMMENDATIONS_RETURNED
            .with_label_values(&[])
            .observe(3.0);
        HTTP_REQUESTS_IN_FLIGHT.set(0);

        let output = encode_metrics();
        assert!(output.contains("cinetag_http_requests_in_flight"));
        assert!(output.contains("cinetag_recommendations_returned"));
    }
}
