//! Similarity between candidates and the user's favourite movies.

use std::collections::{BTreeSet, HashSet};

use futures::future::join_all;
use futures::stream::{self, StreamExt};
use tracing::debug;

use super::config::SimilarityWeights;
use super::types::{ScoredCandidate, UserMovie};
use crate::gateway::MetadataGateway;
use crate::provider::CandidateMovie;

/// Cast members taken from each favourite.
const PROFILE_CAST: usize = 5;
/// Keywords taken from each favourite.
const PROFILE_KEYWORDS: usize = 10;
/// Cast members of a candidate compared against the profile.
const CANDIDATE_CAST: usize = 10;

fn lowercase_set<'a>(items: impl IntoIterator<Item = &'a String>) -> BTreeSet<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Aggregate of the user's favourites.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserProfile {
    pub cast: BTreeSet<String>,
    pub directors: BTreeSet<String>,
    pub writers: BTreeSet<String>,
    pub keywords: BTreeSet<String>,
    pub genres: BTreeSet<String>,
    /// Ids the provider lists as similar to the favourites.
    pub similar_pool: HashSet<u32>,
}

impl UserProfile {
    pub fn from_movies(movies: &[UserMovie]) -> Self {
        let mut profile = Self::default();
        for movie in movies {
            profile
                .cast
                .extend(lowercase_set(movie.cast.iter().take(PROFILE_CAST)));
            profile.directors.extend(lowercase_set(&movie.directors));
            profile.writers.extend(lowercase_set(&movie.writers));
            profile
                .keywords
                .extend(lowercase_set(movie.keywords.iter().take(PROFILE_KEYWORDS)));
            profile.genres.extend(lowercase_set(&movie.genres));
        }
        profile
    }

    pub fn with_similar_pool(self, similar_pool: HashSet<u32>) -> Self {
        Self {
            similar_pool,
            ..self
        }
    }

    /// Nothing to compare against.
    pub fn is_empty(&self) -> bool {
        self.cast.is_empty()
            && self.directors.is_empty()
            && self.writers.is_empty()
            && self.keywords.is_empty()
            && self.genres.is_empty()
            && self.similar_pool.is_empty()
    }
}

/// Profile plus the number of provider lookups that failed building it.
#[derive(Debug, Clone, Default)]
pub struct BuiltProfile {
    pub profile: UserProfile,
    pub failed_lookups: usize,
}

/// Build the profile for a request.
///
/// Favourites given only by id are hydrated through the details endpoint.
/// The first `seed_limit` favourites with an id seed the similar pool.
pub async fn build_profile(
    gateway: &MetadataGateway,
    movies: &[UserMovie],
    seed_limit: usize,
    similar_limit: usize,
    concurrency: usize,
) -> BuiltProfile {
    if movies.is_empty() {
        return BuiltProfile::default();
    }

    let hydrated: Vec<(UserMovie, bool)> = stream::iter(movies.iter().cloned())
        .map(|movie| async move {
            match movie.id {
                Some(id) if !movie.has_attributes() => {
                    let lookup = gateway.fetch_details(id).await;
                    match lookup.value {
                        Some(details) => (UserMovie::from(details), false),
                        None => (movie, lookup.failed),
                    }
                }
                _ => (movie, false),
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut failed_lookups = hydrated.iter().filter(|(_, failed)| *failed).count();
    let movies: Vec<UserMovie> = hydrated.into_iter().map(|(movie, _)| movie).collect();

    let seeds: Vec<u32> = movies.iter().filter_map(|m| m.id).take(seed_limit).collect();
    let similar = join_all(
        seeds
            .iter()
            .map(|id| gateway.fetch_similar(*id, similar_limit)),
    )
    .await;

    let mut pool = HashSet::new();
    for lookup in similar {
        if lookup.failed {
            failed_lookups += 1;
        }
        pool.extend(lookup.value.into_iter().map(|m| m.id));
    }

    let profile = UserProfile::from_movies(&movies).with_similar_pool(pool);
    debug!(
        "Built profile from {} favourites: {} cast, {} directors, {} keywords, {} similar",
        movies.len(),
        profile.cast.len(),
        profile.directors.len(),
        profile.keywords.len(),
        profile.similar_pool.len()
    );

    BuiltProfile {
        profile,
        failed_lookups,
    }
}

/// Overlap coefficient `|A∩B| / min(|A|,|B|)`; 0 when either side is empty.
pub fn overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / smaller as f64
}

pub struct SimilarityScorer {
    weights: SimilarityWeights,
}

impl SimilarityScorer {
    pub fn new(weights: SimilarityWeights) -> Self {
        Self { weights }
    }

    pub fn score(&self, profile: &UserProfile, movie: &CandidateMovie) -> f64 {
        if profile.is_empty() {
            return self.weights.neutral;
        }

        let w = &self.weights;
        let fields = [
            (w.genres, overlap(&profile.genres, &lowercase_set(&movie.genres))),
            (
                w.cast,
                overlap(
                    &profile.cast,
                    &lowercase_set(movie.cast.iter().take(CANDIDATE_CAST)),
                ),
            ),
            (
                w.directors,
                overlap(&profile.directors, &lowercase_set(&movie.directors)),
            ),
            (w.writers, overlap(&profile.writers, &lowercase_set(&movie.writers))),
            (
                w.keywords,
                overlap(&profile.keywords, &lowercase_set(&movie.keywords)),
            ),
        ];

        let mut score: f64 = fields.iter().map(|(weight, value)| weight * value).sum();
        if profile.similar_pool.contains(&movie.id) {
            score += w.similar_bonus;
        }
        score.clamp(0.0, 1.0)
    }

    pub fn apply(&self, profile: &UserProfile, candidates: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
        candidates
            .into_iter()
            .map(|c| {
                let score = self.score(profile, &c.movie);
                c.with_similarity(score)
            })
            .collect()
    }
}
