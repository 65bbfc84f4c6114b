//! Request, pipeline and response types for recommendations.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calibration::CalibrationSettings;
use crate::provider::CandidateMovie;

/// Errors returned by the recommendation engine.
#[derive(Debug, Error)]
pub enum RecommendError {
    /// The request breaks a limit (too many tags, slider out of range...).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The provider could not be reached for any lookup.
    #[error("Movie provider unavailable ({failed_lookups} failed lookups)")]
    ProviderUnavailable { failed_lookups: usize },
}

/// A favourite movie supplied by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMovie {
    #[serde(default, alias = "tmdb_id")]
    pub id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub directors: Vec<String>,
    #[serde(default)]
    pub writers: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl UserMovie {
    /// Whether any profile attribute is present.
    pub fn has_attributes(&self) -> bool {
        !(self.cast.is_empty()
            && self.directors.is_empty()
            && self.writers.is_empty()
            && self.keywords.is_empty()
            && self.genres.is_empty())
    }
}

impl From<CandidateMovie> for UserMovie {
    fn from(movie: CandidateMovie) -> Self {
        Self {
            id: Some(movie.id),
            title: Some(movie.title),
            cast: movie.cast,
            directors: movie.directors,
            writers: movie.writers,
            keywords: movie.keywords,
            genres: movie.genres,
        }
    }
}

/// A tag-based recommendation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub user_tags: Vec<String>,
    #[serde(default)]
    pub calibration_settings: CalibrationSettings,
    #[serde(default)]
    pub user_movies: Option<Vec<UserMovie>>,
    /// Defaults to the engine's configured count when absent.
    #[serde(default)]
    pub max_recommendations: Option<usize>,
    /// Extra ids the user already knows (watch history).
    #[serde(default)]
    pub known_movie_ids: Vec<u32>,
}

impl RecommendationRequest {
    pub fn new(user_tags: &[&str], calibration_settings: CalibrationSettings) -> Self {
        Self {
            user_tags: user_tags.iter().map(|t| t.to_string()).collect(),
            calibration_settings,
            ..Default::default()
        }
    }

    pub fn user_movies(&self) -> &[UserMovie] {
        self.user_movies.as_deref().unwrap_or_default()
    }
}

/// A movie surfaced by the aggregator, with the tags that surfaced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub movie: CandidateMovie,
    pub source_tags: BTreeSet<String>,
}

/// A candidate carrying its stage scores.
///
/// Each stage consumes the value and returns a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub movie: CandidateMovie,
    pub source_tags: BTreeSet<String>,
    pub familiarity_score: f64,
    pub similarity_score: f64,
    /// The details lookup failed, so the runtime is unknown. The discover
    /// query already applied the runtime range on the provider side.
    pub runtime_prefiltered: bool,
}

impl ScoredCandidate {
    /// Created by the familiarity stage; similarity starts at `neutral`.
    pub fn new(candidate: Candidate, familiarity_score: f64, neutral: f64) -> Self {
        Self {
            movie: candidate.movie,
            source_tags: candidate.source_tags,
            familiarity_score,
            similarity_score: neutral,
            runtime_prefiltered: false,
        }
    }

    pub fn with_details(self, details: CandidateMovie) -> Self {
        Self {
            movie: self.movie.merge_details(details),
            ..self
        }
    }

    /// Keep the summary record after a failed details lookup.
    pub fn without_details(self) -> Self {
        Self {
            runtime_prefiltered: self.movie.runtime_minutes.is_none(),
            ..self
        }
    }

    pub fn with_similarity(self, similarity_score: f64) -> Self {
        Self {
            similarity_score,
            ..self
        }
    }
}

/// A ranked recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub tmdb_id: u32,
    pub title: String,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    pub genres: Vec<String>,
    pub vote_average: Option<f32>,
    pub vote_count: Option<u32>,
    pub popularity: Option<f32>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub final_score: f64,
    pub similarity_score: f64,
    pub familiarity_score: f64,
    pub source_tags: Vec<String>,
}

impl Recommendation {
    pub fn new(scored: ScoredCandidate, final_score: f64) -> Self {
        let movie = scored.movie;
        Self {
            tmdb_id: movie.id,
            title: movie.title,
            release_date: movie.release_date,
            runtime: movie.runtime_minutes,
            genres: movie.genres,
            vote_average: movie.vote_average,
            vote_count: movie.vote_count,
            popularity: movie.popularity,
            overview: movie.overview,
            poster_path: movie.poster_path,
            backdrop_path: movie.backdrop_path,
            final_score,
            similarity_score: scored.similarity_score,
            familiarity_score: scored.familiarity_score,
            source_tags: scored.source_tags.into_iter().collect(),
        }
    }
}

/// Per-request summary returned alongside the recommendations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub tags_selected: usize,
    pub tags: Vec<String>,
    pub calibration_settings: CalibrationSettings,
    /// Size of the aggregated superlist.
    pub movies_analyzed: usize,
    pub recommendations_found: usize,
    pub tags_resolved: Vec<String>,
    pub tags_dropped: Vec<String>,
    pub user_movies: usize,
    pub failed_lookups: usize,
    pub discovery_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<Recommendation>,
    pub total_found: usize,
    /// Seconds.
    pub processing_time: f64,
    pub user_profile_summary: ProfileSummary,
}
