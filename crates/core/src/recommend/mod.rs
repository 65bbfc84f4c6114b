//! Tag-based recommendation engine.

mod aggregator;
mod config;
mod engine;
mod familiarity;
mod ranker;
mod similarity;
mod types;

pub use aggregator::{AggregatedCandidates, CandidateAggregator};
pub use config::{EngineConfig, ScoringWeights, SimilarityWeights};
pub use engine::Recommender;
pub use familiarity::{familiarity_score, FamiliarityFilter};
pub use ranker::Ranker;
pub use similarity::{build_profile, overlap, BuiltProfile, SimilarityScorer, UserProfile};
pub use types::*;
