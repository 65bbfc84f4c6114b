//! Movie metadata provider integration (TMDB).
//!
//! The `MovieProvider` trait is the raw network boundary. Caching, timeouts
//! and failure isolation live one level up, in the metadata gateway.

mod tmdb;
mod types;

pub use tmdb::{TmdbClient, TmdbConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the metadata provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),

    /// The call did not finish within the per-call timeout.
    #[error("Request timed out after {0} ms")]
    Timeout(u64),
}

/// Raw access to a movie metadata provider.
#[async_trait]
pub trait MovieProvider: Send + Sync {
    /// Fetch one page of movies matching a genre/keyword and filters.
    async fn discover(&self, query: &DiscoverQuery) -> Result<Vec<CandidateMovie>, ProviderError>;

    /// Fetch one page of movies the provider considers similar to `movie_id`.
    async fn similar(&self, movie_id: u32, page: u32)
        -> Result<Vec<CandidateMovie>, ProviderError>;

    /// Fetch full details (credits, keywords, runtime) for a movie.
    async fn details(&self, movie_id: u32) -> Result<CandidateMovie, ProviderError>;

    /// Provider name for logging and metrics.
    fn name(&self) -> &'static str;
}
