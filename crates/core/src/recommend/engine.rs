//! The recommendation pipeline.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::aggregator::{AggregatedCandidates, CandidateAggregator};
use super::config::EngineConfig;
use super::familiarity::FamiliarityFilter;
use super::ranker::Ranker;
use super::similarity::{build_profile, SimilarityScorer};
use super::types::{
    ProfileSummary, RecommendError, RecommendationRequest, RecommendationResponse, ScoredCandidate,
};
use crate::calibration::CalibrationFilter;
use crate::gateway::MetadataGateway;
use crate::metrics;
use crate::tags::TagTable;

/// Tag-based recommendation engine.
///
/// Pipeline: aggregate → familiarity → detail enrichment → similarity →
/// calibration → rank.
pub struct Recommender {
    gateway: Arc<MetadataGateway>,
    tags: Arc<TagTable>,
    config: EngineConfig,
}

impl Recommender {
    pub fn new(gateway: Arc<MetadataGateway>, tags: Arc<TagTable>, config: EngineConfig) -> Self {
        Self {
            gateway,
            tags,
            config,
        }
    }

    pub fn tags(&self) -> &TagTable {
        &self.tags
    }

    pub fn gateway(&self) -> &MetadataGateway {
        &self.gateway
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResponse, RecommendError> {
        let started = Instant::now();
        let timer = |result: &str| {
            metrics::RECOMMENDATION_DURATION
                .with_label_values(&[result])
                .observe(started.elapsed().as_secs_f64());
        };

        let max_results = match self.validate(request) {
            Ok(max) => max,
            Err(e) => {
                timer("invalid");
                return Err(e);
            }
        };

        let resolution = self.tags.resolve(&request.user_tags);
        let ranges = request.calibration_settings.ranges();
        let filters = ranges.discover_filters();
        let discovery = request.user_tags.is_empty();

        // 1. Aggregate
        let aggregator = CandidateAggregator::new(&self.gateway, self.config.per_tag_limit);
        let aggregated = if discovery {
            aggregator.discover(&filters).await
        } else if resolution.resolved.is_empty() {
            debug!("No tags resolved, skipping provider lookups");
            AggregatedCandidates::default()
        } else {
            aggregator.aggregate(&resolution.resolved, &filters).await
        };

        if aggregated.total_failure() {
            warn!(
                "All {} provider lookups failed, cannot recommend",
                aggregated.lookups
            );
            timer("unavailable");
            return Err(RecommendError::ProviderUnavailable {
                failed_lookups: aggregated.failed_lookups,
            });
        }

        let movies_analyzed = aggregated.candidates.len();
        metrics::CANDIDATES_AGGREGATED
            .with_label_values(&[if discovery { "discovery" } else { "tags" }])
            .observe(movies_analyzed as f64);

        // 2. Profile (favourite hydration + similar pool)
        let built = build_profile(
            &self.gateway,
            request.user_movies(),
            self.config.similar_seed_limit,
            self.config.similar_limit,
            self.config.detail_concurrency,
        )
        .await;

        // 3. Familiarity
        let known: HashSet<u32> = request
            .user_movies()
            .iter()
            .filter_map(|m| m.id)
            .chain(request.known_movie_ids.iter().copied())
            .collect();
        let familiarity = FamiliarityFilter::new(
            known,
            request.calibration_settings.familiarity(),
            self.config.popularity_ceiling,
            self.config.similarity.neutral,
        );
        let candidates = familiarity.apply(aggregated.candidates);

        // 4. Enrich
        let (candidates, enrich_failures) = self.enrich(candidates).await;

        // 5. Similarity
        let candidates =
            SimilarityScorer::new(self.config.similarity).apply(&built.profile, candidates);

        // 6. Calibration
        let candidates = CalibrationFilter::new(ranges).apply(candidates);

        // 7. Rank
        let recommendations =
            Ranker::new(self.config.weights, &resolution.resolved).rank(candidates, max_results);

        let failed_lookups = aggregated.failed_lookups + built.failed_lookups + enrich_failures;
        let summary = ProfileSummary {
            tags_selected: request.user_tags.len(),
            tags: request.user_tags.clone(),
            calibration_settings: request.calibration_settings,
            movies_analyzed,
            recommendations_found: recommendations.len(),
            tags_resolved: resolution.resolved.iter().map(|t| t.tag.clone()).collect(),
            tags_dropped: resolution.dropped,
            user_movies: request.user_movies().len(),
            failed_lookups,
            discovery_fallback: discovery,
        };

        let processing_time = started.elapsed().as_secs_f64();
        timer(if recommendations.is_empty() { "empty" } else { "ok" });
        metrics::RECOMMENDATIONS_RETURNED
            .with_label_values(&[])
            .observe(recommendations.len() as f64);

        info!(
            "Recommended {} of {} candidates for {} tags in {:.2}s ({} failed lookups)",
            recommendations.len(),
            movies_analyzed,
            summary.tags_resolved.len(),
            processing_time,
            failed_lookups
        );

        Ok(RecommendationResponse {
            total_found: recommendations.len(),
            recommendations,
            processing_time,
            user_profile_summary: summary,
        })
    }

    /// Check request limits; returns the effective result count.
    fn validate(&self, request: &RecommendationRequest) -> Result<usize, RecommendError> {
        if request.user_tags.len() > self.config.max_tags {
            return Err(RecommendError::InvalidRequest(format!(
                "at most {} tags are allowed, got {}",
                self.config.max_tags,
                request.user_tags.len()
            )));
        }

        request
            .calibration_settings
            .validate()
            .map_err(RecommendError::InvalidRequest)?;

        let max = request
            .max_recommendations
            .unwrap_or(self.config.default_recommendations);
        if max == 0 || max > self.config.max_recommendations {
            return Err(RecommendError::InvalidRequest(format!(
                "max_recommendations must be between 1 and {}, got {}",
                self.config.max_recommendations, max
            )));
        }
        Ok(max)
    }

    /// Fill in runtime, credits and keywords from the details endpoint.
    ///
    /// A failed lookup keeps the summary record, marked so the runtime cut
    /// trusts the provider-side filter.
    async fn enrich(&self, candidates: Vec<ScoredCandidate>) -> (Vec<ScoredCandidate>, usize) {
        let gateway = &self.gateway;
        let enriched: Vec<(ScoredCandidate, bool)> = stream::iter(candidates)
            .map(|candidate| async move {
                let lookup = gateway.fetch_details(candidate.movie.id).await;
                match lookup.value {
                    Some(details) => (candidate.with_details(details), false),
                    None if lookup.failed => (candidate.without_details(), true),
                    None => (candidate, false),
                }
            })
            .buffered(self.config.detail_concurrency.max(1))
            .collect()
            .await;

        let failures = enriched.iter().filter(|(_, failed)| *failed).count();
        (enriched.into_iter().map(|(c, _)| c).collect(), failures)
    }
}
