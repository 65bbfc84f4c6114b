//! Metadata gateway: cached, time-bounded, failure-isolated provider access.
//!
//! Callers never see a `ProviderError`. A failed lookup yields an empty
//! value flagged as failed, so a dead tag only costs that tag's candidates.

mod cache;

pub use cache::{CacheKey, ResponseCache};

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::metrics;
use crate::provider::{
    CandidateMovie, DiscoverFilters, DiscoverQuery, MovieProvider, ProviderError, ProviderKeyword,
    PAGE_SIZE,
};

/// Result of a gateway lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup<T> {
    pub value: T,
    /// The provider could not answer; `value` is empty.
    pub failed: bool,
}

impl<T: Default> Lookup<T> {
    fn ok(value: T) -> Self {
        Self {
            value,
            failed: false,
        }
    }

    fn failed() -> Self {
        Self {
            value: T::default(),
            failed: true,
        }
    }
}

/// Gateway tuning.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub cache_ttl: Duration,
    pub cache_max_entries: usize,
    pub call_timeout: Duration,
    /// Upper bound on pages fetched by one paged lookup.
    pub max_pages: u32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(24 * 60 * 60),
            cache_max_entries: 10_000,
            call_timeout: Duration::from_secs(10),
            max_pages: 3,
        }
    }
}

/// A single page request.
enum PageRequest {
    Discover(DiscoverQuery),
    Similar { movie_id: u32, page: u32 },
}

impl PageRequest {
    fn endpoint(&self) -> &'static str {
        match self {
            PageRequest::Discover(_) => "discover",
            PageRequest::Similar { .. } => "similar",
        }
    }

    fn cache_key(&self) -> CacheKey {
        match self {
            PageRequest::Discover(query) => CacheKey::Discover(query.signature()),
            PageRequest::Similar { movie_id, page } => CacheKey::Similar {
                movie_id: *movie_id,
                page: *page,
            },
        }
    }
}

pub struct MetadataGateway {
    provider: Arc<dyn MovieProvider>,
    pages: ResponseCache<Vec<CandidateMovie>>,
    details: ResponseCache<CandidateMovie>,
    call_timeout: Duration,
    max_pages: u32,
    failures: AtomicU64,
}

impl MetadataGateway {
    pub fn new(provider: Arc<dyn MovieProvider>, config: GatewayConfig) -> Self {
        Self {
            provider,
            pages: ResponseCache::new(config.cache_ttl, config.cache_max_entries),
            details: ResponseCache::new(config.cache_ttl, config.cache_max_entries),
            call_timeout: config.call_timeout,
            max_pages: config.max_pages.max(1),
            failures: AtomicU64::new(0),
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Total failed provider lookups since creation.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Cached responses across page and detail lookups.
    pub async fn cached_entries(&self) -> usize {
        self.pages.len().await + self.details.len().await
    }

    /// Movies matching a genre or keyword under the given filters.
    pub async fn search_by_tag(
        &self,
        keyword: ProviderKeyword,
        filters: &DiscoverFilters,
        limit: usize,
    ) -> Lookup<Vec<CandidateMovie>> {
        self.collect_pages(limit, |page| {
            PageRequest::Discover(DiscoverQuery {
                with: Some(keyword),
                filters: filters.clone(),
                page,
            })
        })
        .await
    }

    /// Tag-agnostic discovery under the given filters.
    pub async fn discover(&self, filters: &DiscoverFilters, limit: usize) -> Lookup<Vec<CandidateMovie>> {
        self.collect_pages(limit, |page| {
            PageRequest::Discover(DiscoverQuery {
                with: None,
                filters: filters.clone(),
                page,
            })
        })
        .await
    }

    /// Movies the provider lists as similar to `movie_id`.
    pub async fn fetch_similar(&self, movie_id: u32, limit: usize) -> Lookup<Vec<CandidateMovie>> {
        self.collect_pages(limit, |page| PageRequest::Similar { movie_id, page })
            .await
    }

    /// Full details for a movie; `None` on failure.
    pub async fn fetch_details(&self, movie_id: u32) -> Lookup<Option<CandidateMovie>> {
        let key = CacheKey::Details { movie_id };
        let provider = &self.provider;
        let result = self
            .details
            .get_or_fetch(key.clone(), || {
                self.timed_call("details", provider.details(movie_id))
            })
            .await;

        match self.record("details", &key, result) {
            Ok(movie) => Lookup::ok(Some(movie)),
            Err(_) => Lookup::failed(),
        }
    }

    /// Fetch pages in order until `limit` is reached, a page comes back
    /// short, or the page budget runs out.
    ///
    /// The lookup only counts as failed when no page succeeded.
    async fn collect_pages(
        &self,
        limit: usize,
        request: impl Fn(u32) -> PageRequest,
    ) -> Lookup<Vec<CandidateMovie>> {
        let mut movies = Vec::new();
        if limit == 0 {
            return Lookup::ok(movies);
        }

        let mut any_page_ok = false;
        for page in 1..=self.max_pages {
            match self.fetch_page(request(page)).await {
                Ok(results) => {
                    any_page_ok = true;
                    let short = results.len() < PAGE_SIZE;
                    movies.extend(results);
                    if short || movies.len() >= limit {
                        break;
                    }
                }
                Err(_) => break,
            }
        }

        if !any_page_ok {
            return Lookup::failed();
        }
        movies.truncate(limit);
        Lookup::ok(movies)
    }

    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<CandidateMovie>, ProviderError> {
        let endpoint = request.endpoint();
        let key = request.cache_key();
        let request = &request;
        let provider = &self.provider;

        let result = self
            .pages
            .get_or_fetch(key.clone(), move || async move {
                match request {
                    PageRequest::Discover(query) => {
                        self.timed_call(endpoint, provider.discover(query)).await
                    }
                    PageRequest::Similar { movie_id, page } => {
                        self.timed_call(endpoint, provider.similar(*movie_id, *page))
                            .await
                    }
                }
            })
            .await;

        self.record(endpoint, &key, result)
    }

    /// Run one provider call under the per-call timeout.
    async fn timed_call<T>(
        &self,
        endpoint: &'static str,
        call: impl Future<Output = Result<T, ProviderError>>,
    ) -> Result<T, ProviderError> {
        let timer = metrics::PROVIDER_CALL_DURATION
            .with_label_values(&[endpoint])
            .start_timer();
        let result = match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.call_timeout.as_millis() as u64)),
        };
        timer.observe_duration();
        result
    }

    fn record<T>(
        &self,
        endpoint: &'static str,
        key: &CacheKey,
        result: Result<(T, bool), ProviderError>,
    ) -> Result<T, ProviderError> {
        match result {
            Ok((value, hit)) => {
                let outcome = if hit { "hit" } else { "miss" };
                debug!("{} lookup {} ({})", self.provider.name(), key, outcome);
                metrics::PROVIDER_REQUESTS
                    .with_label_values(&[endpoint, outcome])
                    .inc();
                Ok(value)
            }
            Err(e) => {
                warn!("{} lookup {} failed: {}", self.provider.name(), key, e);
                self.failures.fetch_add(1, Ordering::Relaxed);
                metrics::PROVIDER_REQUESTS
                    .with_label_values(&[endpoint, "failed"])
                    .inc();
                Err(e)
            }
        }
    }
}
