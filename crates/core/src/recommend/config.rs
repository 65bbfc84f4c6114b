//! Recommendation engine configuration types.

use serde::{Deserialize, Serialize};

/// Weights of the final score components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Weight of the tag component (coverage + affinity).
    #[serde(default = "default_tag_weight")]
    pub tag: f64,
    #[serde(default = "default_similarity_weight")]
    pub similarity: f64,
    #[serde(default = "default_familiarity_weight")]
    pub familiarity: f64,
    /// Share of the tag component given to synonym affinity (0.0-1.0).
    /// The rest goes to tag coverage.
    #[serde(default = "default_tag_affinity_share")]
    pub tag_affinity_share: f64,
}

fn default_tag_weight() -> f64 {
    0.4
}

fn default_similarity_weight() -> f64 {
    0.35
}

fn default_familiarity_weight() -> f64 {
    0.25
}

fn default_tag_affinity_share() -> f64 {
    0.25
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            tag: default_tag_weight(),
            similarity: default_similarity_weight(),
            familiarity: default_familiarity_weight(),
            tag_affinity_share: default_tag_affinity_share(),
        }
    }
}

/// Per-field weights of the similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityWeights {
    pub genres: f64,
    pub cast: f64,
    pub directors: f64,
    pub writers: f64,
    pub keywords: f64,
    /// Bonus for appearing in the favourites' provider "similar" lists.
    pub similar_bonus: f64,
    /// Score used when there is no profile to compare against.
    pub neutral: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            genres: 0.2,
            cast: 0.2,
            directors: 0.2,
            writers: 0.05,
            keywords: 0.2,
            similar_bonus: 0.15,
            neutral: 0.5,
        }
    }
}

impl SimilarityWeights {
    pub fn as_slice(&self) -> [f64; 6] {
        [
            self.genres,
            self.cast,
            self.directors,
            self.writers,
            self.keywords,
            self.similar_bonus,
        ]
    }
}

/// Engine limits and scoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum candidates taken per tag.
    #[serde(default = "default_per_tag_limit")]
    pub per_tag_limit: usize,
    /// Maximum provider pages fetched per tag.
    #[serde(default = "default_max_pages_per_tag")]
    pub max_pages_per_tag: u32,
    /// Favourites used to seed the similar pool.
    #[serde(default = "default_similar_seed_limit")]
    pub similar_seed_limit: usize,
    /// Similar movies taken per favourite.
    #[serde(default = "default_similar_limit")]
    pub similar_limit: usize,
    /// Concurrent detail lookups during enrichment.
    #[serde(default = "default_detail_concurrency")]
    pub detail_concurrency: usize,
    #[serde(default = "default_recommendations")]
    pub default_recommendations: usize,
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,
    #[serde(default = "default_max_tags")]
    pub max_tags: usize,
    /// Popularity treated as fully mainstream by the familiarity score.
    #[serde(default = "default_popularity_ceiling")]
    pub popularity_ceiling: f64,
    #[serde(default)]
    pub weights: ScoringWeights,
    #[serde(default)]
    pub similarity: SimilarityWeights,
}

fn default_per_tag_limit() -> usize {
    40
}

fn default_max_pages_per_tag() -> u32 {
    3
}

fn default_similar_seed_limit() -> usize {
    40
}

fn default_similar_limit() -> usize {
    20
}

fn default_detail_concurrency() -> usize {
    8
}

fn default_recommendations() -> usize {
    20
}

fn default_max_recommendations() -> usize {
    100
}

fn default_max_tags() -> usize {
    25
}

fn default_popularity_ceiling() -> f64 {
    500.0
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            per_tag_limit: default_per_tag_limit(),
            max_pages_per_tag: default_max_pages_per_tag(),
            similar_seed_limit: default_similar_seed_limit(),
            similar_limit: default_similar_limit(),
            detail_concurrency: default_detail_concurrency(),
            default_recommendations: default_recommendations(),
            max_recommendations: default_max_recommendations(),
            max_tags: default_max_tags(),
            popularity_ceiling: default_popularity_ceiling(),
            weights: ScoringWeights::default(),
            similarity: SimilarityWeights::default(),
        }
    }
}
