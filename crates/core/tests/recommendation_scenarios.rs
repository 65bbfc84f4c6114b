//! Recommendation pipeline scenario tests.
//!
//! These tests run the full engine against the mock provider:
//! - Tag aggregation, dedup and source tag tracking
//! - Discovery fallback when no tags are given
//! - Total provider failure vs. empty results
//! - Calibration filtering and familiarity ordering
//! - Determinism and shared in-flight lookups

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use cinetag_core::{
    testing::{fixtures, MockMovieProvider},
    CalibrationSettings, EngineConfig, GatewayConfig, MetadataGateway, ProviderKeyword,
    RecommendError, RecommendationRequest, Recommender, TagTable,
};

const FEEL_GOOD: ProviderKeyword = ProviderKeyword::Keyword(6054);
const COMEDY: ProviderKeyword = ProviderKeyword::Genre(35);

/// Test helper wiring the engine to a mock provider.
struct TestHarness {
    provider: Arc<MockMovieProvider>,
    recommender: Recommender,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_gateway_config(GatewayConfig::default())
    }

    fn with_gateway_config(config: GatewayConfig) -> Self {
        let provider = Arc::new(MockMovieProvider::new());
        let gateway = Arc::new(MetadataGateway::new(provider.clone(), config));
        let recommender = Recommender::new(
            gateway,
            Arc::new(TagTable::builtin()),
            EngineConfig::default(),
        );
        Self {
            provider,
            recommender,
        }
    }

    /// 15 feel-good and 12 comedy movies, 5 of them shared.
    async fn with_feel_good_and_comedy() -> Self {
        let harness = Self::new();
        harness
            .provider
            .set_discover(Some(FEEL_GOOD), fixtures::movies(1, 15))
            .await;
        harness
            .provider
            .set_discover(Some(COMEDY), fixtures::movies(11, 12))
            .await;
        harness
    }
}

fn scenario_request() -> RecommendationRequest {
    RecommendationRequest {
        max_recommendations: Some(10),
        ..RecommendationRequest::new(
            &["feel-good", "comedy"],
            CalibrationSettings::new(7, 6, 5, 4),
        )
    }
}

#[tokio::test]
async fn test_feel_good_and_comedy_scenario() {
    let harness = TestHarness::with_feel_good_and_comedy().await;

    let response = harness
        .recommender
        .recommend(&scenario_request())
        .await
        .unwrap();

    assert_eq!(response.user_profile_summary.movies_analyzed, 22);
    assert_eq!(response.recommendations.len(), 10);
    assert_eq!(response.total_found, 10);
    assert_eq!(response.user_profile_summary.tags_selected, 2);

    let allowed: HashSet<&str> = ["feel-good", "comedy"].into_iter().collect();
    for rec in &response.recommendations {
        assert!(!rec.source_tags.is_empty());
        assert!(rec.source_tags.iter().all(|t| allowed.contains(t.as_str())));
        assert!((0.0..=1.0).contains(&rec.final_score));
    }

    let ids: HashSet<u32> = response.recommendations.iter().map(|r| r.tmdb_id).collect();
    assert_eq!(ids.len(), response.recommendations.len());
}

#[tokio::test]
async fn test_overlapping_movies_rank_first() {
    let harness = TestHarness::with_feel_good_and_comedy().await;

    let response = harness
        .recommender
        .recommend(&scenario_request())
        .await
        .unwrap();

    // Ids 11-15 were surfaced by both tags.
    let top: Vec<u32> = response
        .recommendations
        .iter()
        .take(5)
        .map(|r| r.tmdb_id)
        .collect();
    assert!(top.iter().all(|id| (11..=15).contains(id)), "{:?}", top);
    assert!(response.recommendations[0].source_tags.len() == 2);
}

#[tokio::test]
async fn test_zero_tags_uses_discovery() {
    let harness = TestHarness::new();
    harness
        .provider
        .set_discover(None, fixtures::movies(100, 8))
        .await;

    let request = RecommendationRequest::new(&[], CalibrationSettings::default());
    let response = harness.recommender.recommend(&request).await.unwrap();

    assert_eq!(response.recommendations.len(), 8);
    assert!(response
        .recommendations
        .iter()
        .all(|r| r.source_tags.is_empty()));
    assert!(response.user_profile_summary.discovery_fallback);
    assert_eq!(harness.provider.discover_calls(None).await, 1);
}

#[tokio::test]
async fn test_every_tag_failing_is_reported() {
    let harness = TestHarness::with_feel_good_and_comedy().await;
    harness.provider.fail_all().await;

    let result = harness.recommender.recommend(&scenario_request()).await;

    assert!(matches!(
        result,
        Err(RecommendError::ProviderUnavailable { failed_lookups: 2 })
    ));
}

#[tokio::test]
async fn test_discovery_failure_is_reported() {
    let harness = TestHarness::new();
    harness.provider.fail_all().await;

    let request = RecommendationRequest::new(&[], CalibrationSettings::default());
    let result = harness.recommender.recommend(&request).await;

    assert!(matches!(
        result,
        Err(RecommendError::ProviderUnavailable { .. })
    ));
}

#[tokio::test]
async fn test_one_failing_tag_is_absorbed() {
    let harness = TestHarness::with_feel_good_and_comedy().await;
    harness.provider.fail_discover(Some(FEEL_GOOD)).await;

    let response = harness
        .recommender
        .recommend(&scenario_request())
        .await
        .unwrap();

    assert_eq!(response.user_profile_summary.movies_analyzed, 12);
    assert_eq!(response.user_profile_summary.failed_lookups, 1);
    assert!(response
        .recommendations
        .iter()
        .all(|r| r.source_tags == vec!["comedy".to_string()]));
}

#[tokio::test]
async fn test_no_match_is_empty_success() {
    let harness = TestHarness::new();
    harness
        .provider
        .set_discover(Some(COMEDY), vec![fixtures::movie(1, "Old", 1950, 10.0)])
        .await;

    let request = RecommendationRequest::new(&["comedy"], CalibrationSettings::new(9, 5, 5, 5));
    let response = harness.recommender.recommend(&request).await.unwrap();

    assert!(response.recommendations.is_empty());
    assert_eq!(response.total_found, 0);
}

#[tokio::test]
async fn test_failed_details_keep_discovered_movies() {
    let harness = TestHarness::new();
    let summaries: Vec<_> = fixtures::movies(1, 5)
        .into_iter()
        .map(|mut movie| {
            movie.runtime_minutes = None;
            movie
        })
        .collect();
    harness
        .provider
        .set_discover(Some(COMEDY), summaries)
        .await;
    harness.provider.fail_details().await;

    let request = RecommendationRequest::new(&["comedy"], CalibrationSettings::default());
    let response = harness.recommender.recommend(&request).await.unwrap();

    assert_eq!(response.recommendations.len(), 5);
    assert_eq!(response.total_found, 5);
    assert_eq!(response.user_profile_summary.movies_analyzed, 5);
    assert_eq!(response.user_profile_summary.failed_lookups, 5);
    assert!(response.recommendations.iter().all(|r| r.runtime.is_none()));
}

#[tokio::test]
async fn test_era_filter_keeps_only_in_range() {
    let harness = TestHarness::new();
    harness
        .provider
        .set_discover(
            Some(COMEDY),
            vec![
                fixtures::movie(1, "Seventies", 1975, 40.0),
                fixtures::movie(2, "Recent", 2015, 40.0),
            ],
        )
        .await;

    let request = RecommendationRequest::new(&["comedy"], CalibrationSettings::new(9, 5, 5, 5));
    let response = harness.recommender.recommend(&request).await.unwrap();

    let ids: Vec<u32> = response.recommendations.iter().map(|r| r.tmdb_id).collect();
    assert_eq!(ids, vec![2]);
}

#[tokio::test]
async fn test_identical_inputs_give_identical_output() {
    let first = TestHarness::with_feel_good_and_comedy().await;
    let second = TestHarness::with_feel_good_and_comedy().await;

    let a = first.recommender.recommend(&scenario_request()).await.unwrap();
    let b = second.recommender.recommend(&scenario_request()).await.unwrap();

    assert_eq!(
        serde_json::to_string(&a.recommendations).unwrap(),
        serde_json::to_string(&b.recommendations).unwrap()
    );
}

#[tokio::test]
async fn test_familiarity_moves_popular_titles_up() {
    let harness = TestHarness::new();
    harness
        .provider
        .set_discover(
            Some(COMEDY),
            vec![
                fixtures::movie(1, "Blockbuster", 2000, 300.0),
                fixtures::movie(2, "Hidden Gem", 2000, 2.0),
            ],
        )
        .await;

    let mut previous_lead = i64::MIN;
    for familiarity in 1..=10 {
        let request = RecommendationRequest::new(
            &["comedy"],
            CalibrationSettings::new(5, 5, 5, familiarity),
        );
        let response = harness.recommender.recommend(&request).await.unwrap();
        let position = |id: u32| {
            response
                .recommendations
                .iter()
                .position(|r| r.tmdb_id == id)
                .unwrap() as i64
        };

        // Positive when the popular title is ahead.
        let lead = position(2) - position(1);
        assert!(
            lead >= previous_lead,
            "familiarity {} moved the popular title down",
            familiarity
        );
        previous_lead = lead;

        if familiarity == 1 {
            assert_eq!(response.recommendations[0].tmdb_id, 2);
        }
        if familiarity == 10 {
            assert_eq!(response.recommendations[0].tmdb_id, 1);
        }
    }
}

#[tokio::test]
async fn test_favourites_boost_similar_candidates() {
    let harness = TestHarness::new();
    harness
        .provider
        .set_discover(
            Some(COMEDY),
            vec![
                fixtures::detailed_movie(1, "Lady Bird", &[], &["Greta Gerwig"], &[]),
                fixtures::detailed_movie(2, "Other Film", &[], &["Someone Else"], &[]),
            ],
        )
        .await;

    let request = RecommendationRequest {
        user_movies: Some(vec![fixtures::user_movie(
            500,
            &[],
            &["Greta Gerwig"],
            &[],
        )]),
        ..RecommendationRequest::new(&["comedy"], CalibrationSettings::default())
    };
    let response = harness.recommender.recommend(&request).await.unwrap();

    assert_eq!(response.recommendations[0].tmdb_id, 1);
    assert!(
        response.recommendations[0].similarity_score
            > response.recommendations[1].similarity_score
    );
}

#[tokio::test]
async fn test_concurrent_identical_requests_share_lookups() {
    let harness = TestHarness::with_feel_good_and_comedy().await;
    harness
        .provider
        .set_delay(Duration::from_millis(20))
        .await;

    let request = scenario_request();
    let (a, b) = tokio::join!(
        harness.recommender.recommend(&request),
        harness.recommender.recommend(&request)
    );

    assert!(a.is_ok() && b.is_ok());
    assert_eq!(harness.provider.discover_calls(Some(COMEDY)).await, 1);
    assert_eq!(harness.provider.discover_calls(Some(FEEL_GOOD)).await, 1);
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let harness = TestHarness::with_gateway_config(GatewayConfig {
        call_timeout: Duration::from_millis(20),
        ..Default::default()
    });
    harness
        .provider
        .set_discover(Some(COMEDY), fixtures::movies(1, 3))
        .await;
    harness
        .provider
        .set_delay(Duration::from_millis(200))
        .await;

    let request = RecommendationRequest::new(&["comedy"], CalibrationSettings::default());
    let result = harness.recommender.recommend(&request).await;

    assert!(matches!(
        result,
        Err(RecommendError::ProviderUnavailable { failed_lookups: 1 })
    ));
}
