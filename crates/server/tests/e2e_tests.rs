//! End-to-end tests with a mocked movie provider.
//!
//! These tests run the full router in-process: routing, JSON extraction,
//! error mapping, the metrics middleware and the engine behind it.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use cinetag_core::ProviderKeyword;
use common::{fixtures, TestFixture, TEST_API_KEY};

const TAG_ENDPOINT: &str = "/api/v1/recommendations/tag-based";
const FEEL_GOOD: ProviderKeyword = ProviderKeyword::Keyword(6054);
const COMEDY: ProviderKeyword = ProviderKeyword::Genre(35);

async fn fixture_with_catalog() -> TestFixture {
    let fixture = TestFixture::new();
    fixture
        .provider
        .set_discover(Some(FEEL_GOOD), fixtures::movies(1, 15))
        .await;
    fixture
        .provider
        .set_discover(Some(COMEDY), fixtures::movies(11, 12))
        .await;
    fixture
}

// =============================================================================
// Basic API Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/health").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["provider"], "mock");
    assert_eq!(response.body["provider_failures"], 0);
    assert_eq!(response.body["cached_responses"], 0);
}

#[tokio::test]
async fn test_health_reports_provider_failures() {
    let fixture = fixture_with_catalog().await;
    fixture.provider.fail_discover(Some(COMEDY)).await;
    fixture
        .post(TAG_ENDPOINT, json!({"user_tags": ["feel-good", "comedy"]}))
        .await;

    let response = fixture.get("/api/v1/health").await;

    assert_status!(response, StatusCode::OK);
    assert!(response.body["provider_failures"].as_u64().unwrap() >= 1);
    assert!(response.body["cached_responses"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn test_config_hides_api_key() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/config").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["tmdb"]["api_key_configured"], true);
    assert!(response.body["tmdb"].get("api_key").is_none());
    assert!(!response.text.contains(TEST_API_KEY));
    assert_eq!(response.body["engine"]["max_recommendations"], 100);
}

#[tokio::test]
async fn test_list_tags_sorted() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/tags").await;

    assert_status!(response, StatusCode::OK);
    let tags: Vec<String> = response.body["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect();
    assert!(tags.contains(&"comedy".to_string()));
    assert!(tags.contains(&"feel-good".to_string()));

    let mut sorted = tags.clone();
    sorted.sort();
    assert_eq!(tags, sorted);
    assert_eq!(response.body["total"], tags.len());
}

#[tokio::test]
async fn test_list_tags_by_category() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/tags?category=vibe").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["category"], "vibe");
    assert_eq!(response.body["total"], 3);
    let tags = response.body["tags"].as_array().unwrap();
    assert!(tags.iter().all(|t| t["category"] == "vibe"));

    let slow_burn = tags.iter().find(|t| t["name"] == "slow-burn").unwrap();
    let related = slow_burn["related_keywords"].as_array().unwrap();
    assert!(related.contains(&json!("atmospheric")));
    assert!(!related.contains(&json!("slow burn")));
}

#[tokio::test]
async fn test_list_tags_unknown_category() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/tags?category=colour").await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_keywords_status_builtin_only() {
    let fixture = TestFixture::new();
    let tags = fixture.get("/api/v1/tags").await;
    let response = fixture.get("/api/v1/keywords/status").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "builtin_only");
    assert_eq!(response.body["builtin_tags"], tags.body["total"]);
    assert_eq!(response.body["loaded_keywords"], 0);
    assert!(response.body["keywords_file"].is_null());
}

#[tokio::test]
async fn test_keyword_search() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/keywords/search?q=COMED&limit=5").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["query"], "COMED");
    let results = response.body["results"].as_array().unwrap();
    assert!(!results.is_empty());
    assert!(results.len() <= 5);
    assert!(results
        .iter()
        .any(|r| r["name"] == "comedy" && r["kind"] == "genre" && r["id"] == 35));
    assert_eq!(response.body["total_found"], results.len());
}

#[tokio::test]
async fn test_keyword_search_empty_query() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/keywords/search").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["total_found"], 0);
}

// =============================================================================
// Recommendation Tests
// =============================================================================

#[tokio::test]
async fn test_recommendations_success() {
    let fixture = fixture_with_catalog().await;

    let response = fixture
        .post(
            TAG_ENDPOINT,
            json!({
                "user_tags": ["feel-good", "comedy"],
                "calibration_settings": {"era": 7, "runtime": 6, "popularity": 5, "familiarity": 4},
                "max_recommendations": 10
            }),
        )
        .await;

    assert_status!(response, StatusCode::OK);
    let recommendations = response.body["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 10);
    assert_eq!(response.body["total_found"], 10);
    assert_eq!(response.body["user_profile_summary"]["movies_analyzed"], 22);
    assert_eq!(response.body["user_profile_summary"]["tags_selected"], 2);
    assert!(response.body["processing_time"].is_number());

    let first = &recommendations[0];
    assert!(first["tmdb_id"].is_number());
    assert!(first["title"].is_string());
    let score = first["final_score"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&score));
    assert!(!first["source_tags"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_recommendations_zero_tags_discovery() {
    let fixture = TestFixture::new();
    fixture
        .provider
        .set_discover(None, fixtures::movies(100, 5))
        .await;

    let response = fixture
        .post(TAG_ENDPOINT, json!({"user_tags": []}))
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["recommendations"].as_array().unwrap().len(), 5);
    assert_eq!(response.body["user_profile_summary"]["discovery_fallback"], true);
}

#[tokio::test]
async fn test_recommendations_malformed_json() {
    let fixture = TestFixture::new();
    let response = fixture.post_raw(TAG_ENDPOINT, "{not json").await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn test_recommendations_slider_out_of_range() {
    let fixture = TestFixture::new();
    let response = fixture
        .post(
            TAG_ENDPOINT,
            json!({
                "user_tags": ["comedy"],
                "calibration_settings": {"era": 11, "runtime": 5, "popularity": 5, "familiarity": 5}
            }),
        )
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());
    assert!(response.body.get("fallback").is_none());
}

#[tokio::test]
async fn test_recommendations_too_many_results_requested() {
    let fixture = TestFixture::new();
    let response = fixture
        .post(
            TAG_ENDPOINT,
            json!({"user_tags": ["comedy"], "max_recommendations": 1000}),
        )
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommendations_provider_unavailable() {
    let fixture = fixture_with_catalog().await;
    fixture.provider.fail_all().await;

    let response = fixture
        .post(
            TAG_ENDPOINT,
            json!({"user_tags": ["feel-good", "comedy"]}),
        )
        .await;

    assert_status!(response, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["fallback"], "discovery");
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn test_recommendations_no_match_is_empty_ok() {
    let fixture = TestFixture::new();
    let response = fixture
        .post(TAG_ENDPOINT, json!({"user_tags": ["not-a-real-tag"]}))
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["total_found"], 0);
    assert_eq!(
        response.body["user_profile_summary"]["tags_dropped"][0],
        "not-a-real-tag"
    );
}

#[tokio::test]
async fn test_example_recommendations() {
    let fixture = fixture_with_catalog().await;
    let response = fixture.get("/api/v1/example").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["recommendations"].as_array().unwrap().len(), 5);
    let summary = &response.body["user_profile_summary"];
    assert_eq!(summary["tags"], json!(["feel-good", "comedy"]));
    assert_eq!(summary["calibration_settings"]["era"], 7);
    assert_eq!(summary["calibration_settings"]["runtime"], 6);
}

#[tokio::test]
async fn test_example_recommendations_provider_unavailable() {
    let fixture = fixture_with_catalog().await;
    fixture.provider.fail_all().await;

    let response = fixture.get("/api/v1/example").await;

    assert_status!(response, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["fallback"], "discovery");
}

// =============================================================================
// Metrics
// =============================================================================

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = fixture_with_catalog().await;
    fixture.get("/api/v1/health").await;
    fixture
        .post(TAG_ENDPOINT, json!({"user_tags": ["comedy"]}))
        .await;

    let response = fixture.get("/metrics").await;

    assert_status!(response, StatusCode::OK);
    assert!(response.text.contains("cinetag_http_requests_total"));
    assert!(response.text.contains("cinetag_recommendation_duration_seconds"));
    assert!(response.text.contains("cinetag_provider_requests_total"));
}
