use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{handlers, middleware::metrics_middleware, recommendations, tags};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Recommendations
        .route(
            "/recommendations/tag-based",
            post(recommendations::recommend_by_tags),
        )
        .route("/example", get(recommendations::example_recommendations))
        // Tag table
        .route("/tags", get(tags::list_tags))
        .route("/keywords/search", get(tags::search_keywords))
        .route("/keywords/status", get(tags::keywords_status))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
