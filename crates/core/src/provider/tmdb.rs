//! TMDB (The Movie Database) API client.
//!
//! TMDB requires an API key for access.
//! Rate limits are generous (around 40 requests per second).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{genre_name, CandidateMovie, DiscoverQuery};
use super::{MovieProvider, ProviderError};

/// Cast members kept from a credits listing.
const MAX_CAST: usize = 10;

/// Crew jobs treated as writing credits.
const WRITER_JOBS: &[&str] = &["Writer", "Screenplay", "Story"];

/// TMDB API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// TMDB API key (required).
    #[serde(default)]
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Per-call timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    10
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

/// TMDB API client.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://api.themoviedb.org/3".to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }

    async fn check_status(response: Response, what: &str) -> Result<Response, ProviderError> {
        let status = response.status();
        if status == 401 {
            return Err(ProviderError::NotConfigured(
                "Invalid TMDB API key".to_string(),
            ));
        }
        if status == 404 {
            return Err(ProviderError::NotFound(what.to_string()));
        }
        if status == 429 {
            return Err(ProviderError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(response)
    }

    async fn fetch_page(
        &self,
        url: &str,
        params: &[(&str, String)],
        what: &str,
    ) -> Result<Vec<CandidateMovie>, ProviderError> {
        let response = self
            .client
            .get(url)
            .query(&[("api_key", &self.api_key)])
            .query(params)
            .send()
            .await?;

        let response = Self::check_status(response, what).await?;

        let page: TmdbPageResponse = response.json().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to parse {} response: {}", what, e))
        })?;

        Ok(page.results.into_iter().map(|r| r.into()).collect())
    }
}

#[async_trait]
impl MovieProvider for TmdbClient {
    async fn discover(&self, query: &DiscoverQuery) -> Result<Vec<CandidateMovie>, ProviderError> {
        let url = format!("{}/discover/movie", self.base_url);
        debug!("TMDB discover: {}", query.signature());
        self.fetch_page(&url, &query.to_params(), "discover").await
    }

    async fn similar(
        &self,
        movie_id: u32,
        page: u32,
    ) -> Result<Vec<CandidateMovie>, ProviderError> {
        let url = format!("{}/movie/{}/similar", self.base_url, movie_id);
        debug!("TMDB similar: id={}, page={}", movie_id, page);
        self.fetch_page(
            &url,
            &[("page", page.to_string())],
            &format!("similar movies for {}", movie_id),
        )
        .await
    }

    async fn details(&self, movie_id: u32) -> Result<CandidateMovie, ProviderError> {
        let url = format!("{}/movie/{}", self.base_url, movie_id);

        debug!("TMDB get movie: id={}", movie_id);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("append_to_response", "credits,keywords"),
            ])
            .send()
            .await?;

        let response = Self::check_status(response, &format!("Movie ID {}", movie_id)).await?;

        let movie: TmdbMovieDetails = response.json().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to parse movie response: {}", e))
        })?;

        Ok(movie.into())
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbPageResponse {
    #[serde(default)]
    results: Vec<TmdbMovieResult>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieResult {
    id: u32,
    #[serde(default)]
    title: String,
    release_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    #[serde(default)]
    genre_ids: Vec<u32>,
    popularity: Option<f32>,
    vote_average: Option<f32>,
    vote_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieDetails {
    id: u32,
    #[serde(default)]
    title: String,
    release_date: Option<String>,
    runtime: Option<u32>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    #[serde(default)]
    genres: Vec<TmdbNamed>,
    popularity: Option<f32>,
    vote_average: Option<f32>,
    vote_count: Option<u32>,
    #[serde(default)]
    credits: Option<TmdbCredits>,
    #[serde(default)]
    keywords: Option<TmdbKeywords>,
}

#[derive(Debug, Deserialize)]
struct TmdbNamed {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct TmdbCredits {
    #[serde(default)]
    cast: Vec<TmdbCastMember>,
    #[serde(default)]
    crew: Vec<TmdbCrewMember>,
}

#[derive(Debug, Deserialize)]
struct TmdbCastMember {
    name: String,
    #[serde(default)]
    order: u32,
}

#[derive(Debug, Deserialize)]
struct TmdbCrewMember {
    name: String,
    #[serde(default)]
    job: String,
}

#[derive(Debug, Default, Deserialize)]
struct TmdbKeywords {
    #[serde(default)]
    keywords: Vec<TmdbNamed>,
}

// ============================================================================
// Conversions
// ============================================================================

/// TMDB returns an empty string for unknown release dates.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<TmdbMovieResult> for CandidateMovie {
    fn from(r: TmdbMovieResult) -> Self {
        Self {
            id: r.id,
            title: r.title,
            release_date: non_empty(r.release_date),
            runtime_minutes: None, // Not available in list results
            genres: r
                .genre_ids
                .into_iter()
                .filter_map(genre_name)
                .map(str::to_string)
                .collect(),
            popularity: r.popularity,
            vote_average: r.vote_average,
            vote_count: r.vote_count,
            overview: non_empty(r.overview),
            poster_path: r.poster_path,
            backdrop_path: r.backdrop_path,
            ..Default::default()
        }
    }
}

impl From<TmdbMovieDetails> for CandidateMovie {
    fn from(d: TmdbMovieDetails) -> Self {
        let credits = d.credits.unwrap_or_default();

        let mut cast = credits.cast;
        cast.sort_by_key(|c| c.order);

        let directors = credits
            .crew
            .iter()
            .filter(|c| c.job == "Director")
            .map(|c| c.name.clone())
            .collect();
        let writers = credits
            .crew
            .iter()
            .filter(|c| WRITER_JOBS.contains(&c.job.as_str()))
            .map(|c| c.name.clone())
            .collect();

        Self {
            id: d.id,
            title: d.title,
            release_date: non_empty(d.release_date),
            runtime_minutes: d.runtime.filter(|m| *m > 0),
            genres: d.genres.into_iter().map(|g| g.name).collect(),
            cast: cast.into_iter().take(MAX_CAST).map(|c| c.name).collect(),
            directors,
            writers,
            keywords: d
                .keywords
                .unwrap_or_default()
                .keywords
                .into_iter()
                .map(|k| k.name)
                .collect(),
            popularity: d.popularity,
            vote_average: d.vote_average,
            vote_count: d.vote_count,
            overview: non_empty(d.overview),
            poster_path: d.poster_path,
            backdrop_path: d.backdrop_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_api_key() {
        let result = TmdbClient::new(TmdbConfig {
            api_key: String::new(),
            base_url: None,
            timeout_secs: 10,
        });
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }

    #[test]
    fn test_list_result_conversion() {
        let json = r#"{
            "id": 603,
            "title": "The Matrix",
            "release_date": "1999-03-30",
            "overview": "A computer hacker...",
            "poster_path": "/poster.jpg",
            "genre_ids": [28, 878, 424242],
            "popularity": 83.5,
            "vote_average": 8.2,
            "vote_count": 24000
        }"#;
        let result: TmdbMovieResult = serde_json::from_str(json).unwrap();

        let movie: CandidateMovie = result.into();
        assert_eq!(movie.id, 603);
        assert_eq!(movie.year(), Some(1999));
        assert_eq!(movie.genres, vec!["Action", "Science Fiction"]);
        assert!(movie.runtime_minutes.is_none()); // Not in list results
        assert!(movie.cast.is_empty());
    }

    #[test]
    fn test_empty_release_date_becomes_none() {
        let json = r#"{"id": 1, "title": "Unreleased", "release_date": ""}"#;
        let result: TmdbMovieResult = serde_json::from_str(json).unwrap();
        let movie: CandidateMovie = result.into();
        assert!(movie.release_date.is_none());
        assert!(movie.year().is_none());
    }

    #[test]
    fn test_details_conversion_with_credits_and_keywords() {
        let json = r#"{
            "id": 550,
            "title": "Fight Club",
            "release_date": "1999-10-15",
            "runtime": 139,
            "genres": [{"id": 18, "name": "Drama"}],
            "popularity": 61.4,
            "vote_average": 8.4,
            "vote_count": 27000,
            "credits": {
                "cast": [
                    {"name": "Edward Norton", "order": 1},
                    {"name": "Brad Pitt", "order": 0}
                ],
                "crew": [
                    {"name": "David Fincher", "job": "Director"},
                    {"name": "Jim Uhls", "job": "Screenplay"},
                    {"name": "Jeff Cronenweth", "job": "Director of Photography"}
                ]
            },
            "keywords": {"keywords": [{"id": 825, "name": "support group"}]}
        }"#;
        let details: TmdbMovieDetails = serde_json::from_str(json).unwrap();

        let movie: CandidateMovie = details.into();
        assert_eq!(movie.runtime_minutes, Some(139));
        assert_eq!(movie.cast, vec!["Brad Pitt", "Edward Norton"]);
        assert_eq!(movie.directors, vec!["David Fincher"]);
        assert_eq!(movie.writers, vec!["Jim Uhls"]);
        assert_eq!(movie.keywords, vec!["support group"]);
        assert_eq!(movie.genres, vec!["Drama"]);
    }

    #[test]
    fn test_details_zero_runtime_is_unknown() {
        let json = r#"{"id": 2, "title": "Short", "runtime": 0}"#;
        let details: TmdbMovieDetails = serde_json::from_str(json).unwrap();
        let movie: CandidateMovie = details.into();
        assert!(movie.runtime_minutes.is_none());
    }
}
