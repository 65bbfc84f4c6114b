use axum::{extract::State, http::header, response::IntoResponse, Json};
use cinetag_core::SanitizedConfig;
use serde::Serialize;
use std::sync::Arc;

use crate::metrics::encode_metrics;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub provider: String,
    pub tags_loaded: usize,
    /// Failed provider lookups since startup.
    pub provider_failures: u64,
    pub cached_responses: usize,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let gateway = state.recommender().gateway();
    Json(HealthResponse {
        status: "ok".to_string(),
        provider: gateway.provider_name().to_string(),
        tags_loaded: state.tags().len(),
        provider_failures: gateway.failures(),
        cached_responses: gateway.cached_entries().await,
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

/// Prometheus scrape endpoint.
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}
