//! Tag-based recommendation endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use cinetag_core::{
    CalibrationSettings, RecommendError, RecommendationRequest, RecommendationResponse,
};

use crate::state::AppState;

/// Error body returned by the recommendation endpoint.
#[derive(Debug, Serialize)]
pub struct RecommendationErrorResponse {
    pub error: String,
    /// Set when the client should fall back to plain discovery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

type ErrorReply = (StatusCode, Json<RecommendationErrorResponse>);
type RecommendationReply = Result<Json<RecommendationResponse>, ErrorReply>;

fn error_reply(status: StatusCode, error: String, fallback: Option<&str>) -> ErrorReply {
    (
        status,
        Json(RecommendationErrorResponse {
            error,
            fallback: fallback.map(str::to_string),
        }),
    )
}

/// POST /api/v1/recommendations/tag-based
pub async fn recommend_by_tags(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RecommendationRequest>, JsonRejection>,
) -> RecommendationReply {
    let Json(request) = body.map_err(|rejection| {
        error_reply(StatusCode::BAD_REQUEST, rejection.body_text(), None)
    })?;
    recommend(&state, request).await
}

/// GET /api/v1/example
///
/// Canned feel-good comedy request for trying the service out.
pub async fn example_recommendations(State(state): State<Arc<AppState>>) -> RecommendationReply {
    let request = RecommendationRequest {
        max_recommendations: Some(5),
        ..RecommendationRequest::new(
            &["feel-good", "comedy"],
            CalibrationSettings::new(7, 6, 5, 4),
        )
    };
    recommend(&state, request).await
}

async fn recommend(state: &AppState, request: RecommendationRequest) -> RecommendationReply {
    let span = tracing::info_span!("recommend", request_id = %Uuid::new_v4());
    async move {
        info!(
            tags = request.user_tags.len(),
            user_movies = request.user_movies().len(),
            "Recommendation request"
        );

        match state.recommender().recommend(&request).await {
            Ok(response) => Ok(Json(response)),
            Err(e @ RecommendError::InvalidRequest(_)) => {
                Err(error_reply(StatusCode::BAD_REQUEST, e.to_string(), None))
            }
            Err(e @ RecommendError::ProviderUnavailable { .. }) => {
                warn!(error = %e, "Recommendation failed, provider unavailable");
                Err(error_reply(
                    StatusCode::SERVICE_UNAVAILABLE,
                    e.to_string(),
                    Some("discovery"),
                ))
            }
        }
    }
    .instrument(span)
    .await
}
