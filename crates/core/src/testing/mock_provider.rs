//! Mock movie provider for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::provider::{
    CandidateMovie, DiscoverQuery, MovieProvider, ProviderError, ProviderKeyword, PAGE_SIZE,
};

/// A recorded provider call for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedProviderQuery {
    Discover(DiscoverQuery),
    Similar { movie_id: u32, page: u32 },
    Details { movie_id: u32 },
}

/// Mock implementation of the MovieProvider trait.
///
/// Provides controllable behavior for testing:
/// - Discover lists per genre/keyword (or tag-agnostic), paged by 20
/// - Similar lists and details per movie
/// - Track calls for assertions
/// - Simulate failures and slow responses
///
/// Discover queries are matched on their genre/keyword only; filters are
/// ignored, so client-side filtering is what decides the final result.
///
/// # Example
///
/// ```rust,ignore
/// use cinetag_core::testing::{MockMovieProvider, fixtures};
/// use cinetag_core::ProviderKeyword;
///
/// let provider = MockMovieProvider::new();
/// provider.set_discover(Some(ProviderKeyword::Genre(35)), fixtures::movies(1, 12)).await;
/// provider.fail_discover(Some(ProviderKeyword::Genre(27))).await;
/// ```
#[derive(Debug)]
pub struct MockMovieProvider {
    /// Movie details by ID.
    movies: Arc<RwLock<HashMap<u32, CandidateMovie>>>,
    /// Discover results by genre/keyword (`None` = tag-agnostic).
    discover: Arc<RwLock<HashMap<Option<ProviderKeyword>, Vec<CandidateMovie>>>>,
    /// Similar results by seed movie ID.
    similar: Arc<RwLock<HashMap<u32, Vec<CandidateMovie>>>>,
    /// Discover targets that fail.
    failing_discover: Arc<RwLock<HashSet<Option<ProviderKeyword>>>>,
    /// Every call fails.
    fail_all: Arc<RwLock<bool>>,
    /// Details calls fail.
    fail_details: Arc<RwLock<bool>>,
    /// Artificial latency per call.
    delay: Arc<RwLock<Option<Duration>>>,
    /// Recorded calls.
    queries: Arc<RwLock<Vec<RecordedProviderQuery>>>,
}

impl Default for MockMovieProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMovieProvider {
    pub fn new() -> Self {
        Self {
            movies: Arc::new(RwLock::new(HashMap::new())),
            discover: Arc::new(RwLock::new(HashMap::new())),
            similar: Arc::new(RwLock::new(HashMap::new())),
            failing_discover: Arc::new(RwLock::new(HashSet::new())),
            fail_all: Arc::new(RwLock::new(false)),
            fail_details: Arc::new(RwLock::new(false)),
            delay: Arc::new(RwLock::new(None)),
            queries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Add a movie served by the details endpoint.
    pub async fn add_movie(&self, movie: CandidateMovie) {
        self.movies.write().await.insert(movie.id, movie);
    }

    /// Set the discover results for a genre/keyword.
    ///
    /// The movies also become available through the details endpoint.
    pub async fn set_discover(&self, with: Option<ProviderKeyword>, movies: Vec<CandidateMovie>) {
        {
            let mut details = self.movies.write().await;
            for movie in &movies {
                details.entry(movie.id).or_insert_with(|| movie.clone());
            }
        }
        self.discover.write().await.insert(with, movies);
    }

    /// Set the similar results for a seed movie.
    pub async fn set_similar(&self, movie_id: u32, movies: Vec<CandidateMovie>) {
        self.similar.write().await.insert(movie_id, movies);
    }

    /// Make discover calls for this genre/keyword fail.
    pub async fn fail_discover(&self, with: Option<ProviderKeyword>) {
        self.failing_discover.write().await.insert(with);
    }

    /// Make every call fail.
    pub async fn fail_all(&self) {
        *self.fail_all.write().await = true;
    }

    /// Make details calls fail with a rate limit, as a throttled provider does.
    pub async fn fail_details(&self) {
        *self.fail_details.write().await = true;
    }

    /// Remove all configured failures.
    pub async fn clear_failures(&self) {
        self.failing_discover.write().await.clear();
        *self.fail_all.write().await = false;
        *self.fail_details.write().await = false;
    }

    /// Delay every call by `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    // =========================================================================
    // Assertions
    // =========================================================================

    /// Get all recorded calls.
    pub async fn recorded_queries(&self) -> Vec<RecordedProviderQuery> {
        self.queries.read().await.clone()
    }

    /// Number of discover calls made for a genre/keyword.
    pub async fn discover_calls(&self, with: Option<ProviderKeyword>) -> usize {
        self.queries
            .read()
            .await
            .iter()
            .filter(|q| matches!(q, RecordedProviderQuery::Discover(query) if query.with == with))
            .count()
    }

    /// Number of details calls made for a movie.
    pub async fn details_calls(&self, movie_id: u32) -> usize {
        self.queries
            .read()
            .await
            .iter()
            .filter(|q| **q == RecordedProviderQuery::Details { movie_id })
            .count()
    }

    /// Number of similar calls made for a seed movie (all pages).
    pub async fn similar_calls(&self, movie_id: u32) -> usize {
        self.queries
            .read()
            .await
            .iter()
            .filter(|q| matches!(q, RecordedProviderQuery::Similar { movie_id: id, .. } if *id == movie_id))
            .count()
    }

    /// Clear recorded calls.
    pub async fn clear_queries(&self) {
        self.queries.write().await.clear();
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn begin(&self, query: RecordedProviderQuery) -> Result<(), ProviderError> {
        self.queries.write().await.push(query);

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if *self.fail_all.read().await {
            return Err(mock_failure());
        }
        Ok(())
    }
}

fn mock_failure() -> ProviderError {
    ProviderError::ApiError {
        status: 503,
        message: "mock provider failure".to_string(),
    }
}

fn page_of(movies: &[CandidateMovie], page: u32) -> Vec<CandidateMovie> {
    let start = (page.saturating_sub(1) as usize) * PAGE_SIZE;
    movies.iter().skip(start).take(PAGE_SIZE).cloned().collect()
}

#[async_trait]
impl MovieProvider for MockMovieProvider {
    async fn discover(&self, query: &DiscoverQuery) -> Result<Vec<CandidateMovie>, ProviderError> {
        self.begin(RecordedProviderQuery::Discover(query.clone()))
            .await?;

        if self.failing_discover.read().await.contains(&query.with) {
            return Err(mock_failure());
        }

        Ok(self
            .discover
            .read()
            .await
            .get(&query.with)
            .map(|movies| page_of(movies, query.page))
            .unwrap_or_default())
    }

    async fn similar(
        &self,
        movie_id: u32,
        page: u32,
    ) -> Result<Vec<CandidateMovie>, ProviderError> {
        self.begin(RecordedProviderQuery::Similar { movie_id, page })
            .await?;

        Ok(self
            .similar
            .read()
            .await
            .get(&movie_id)
            .map(|movies| page_of(movies, page))
            .unwrap_or_default())
    }

    async fn details(&self, movie_id: u32) -> Result<CandidateMovie, ProviderError> {
        self.begin(RecordedProviderQuery::Details { movie_id })
            .await?;

        if *self.fail_details.read().await {
            return Err(ProviderError::RateLimitExceeded);
        }

        self.movies
            .read()
            .await
            .get(&movie_id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("Movie ID {}", movie_id)))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
