//! Types shared by movie metadata providers.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of results the provider returns per page.
pub const PAGE_SIZE: usize = 20;

/// TMDB's fixed movie genre list.
pub const MOVIE_GENRES: &[(u32, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

/// Look up a genre name by its provider id.
pub fn genre_name(id: u32) -> Option<&'static str> {
    MOVIE_GENRES
        .iter()
        .find(|(genre_id, _)| *genre_id == id)
        .map(|(_, name)| *name)
}

/// Provider-side identifier a tag resolves to.
///
/// Genres and keywords are separate filters on the discover endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ProviderKeyword {
    Genre(u32),
    Keyword(u32),
}

impl std::fmt::Display for ProviderKeyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKeyword::Genre(id) => write!(f, "genre:{}", id),
            ProviderKeyword::Keyword(id) => write!(f, "keyword:{}", id),
        }
    }
}

/// Sort order for discover queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    PopularityAsc,
    #[default]
    PopularityDesc,
    VoteAverageDesc,
}

impl SortOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::PopularityAsc => "popularity.asc",
            SortOrder::PopularityDesc => "popularity.desc",
            SortOrder::VoteAverageDesc => "vote_average.desc",
        }
    }
}

/// Server-side filters for a discover query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoverFilters {
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub min_runtime: Option<u32>,
    pub max_runtime: Option<u32>,
    pub min_vote_average: Option<f32>,
    pub min_vote_count: Option<u32>,
    pub sort_by: SortOrder,
}

impl DiscoverFilters {
    /// Render the filters as provider query parameters, in a stable order.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("sort_by", self.sort_by.as_param().to_string())];
        if let Some(year) = self.min_year {
            params.push(("primary_release_date.gte", format!("{}-01-01", year)));
        }
        if let Some(year) = self.max_year {
            params.push(("primary_release_date.lte", format!("{}-12-31", year)));
        }
        if let Some(minutes) = self.min_runtime {
            params.push(("with_runtime.gte", minutes.to_string()));
        }
        if let Some(minutes) = self.max_runtime {
            params.push(("with_runtime.lte", minutes.to_string()));
        }
        if let Some(vote) = self.min_vote_average {
            params.push(("vote_average.gte", format!("{:.1}", vote)));
        }
        if let Some(count) = self.min_vote_count {
            params.push(("vote_count.gte", count.to_string()));
        }
        params
    }
}

/// A single page request against the discover endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverQuery {
    /// Genre or keyword to match. `None` means tag-agnostic discovery.
    pub with: Option<ProviderKeyword>,
    pub filters: DiscoverFilters,
    /// 1-based page number.
    pub page: u32,
}

impl DiscoverQuery {
    /// All query parameters for this request (API key excluded).
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = self.filters.to_params();
        match self.with {
            Some(ProviderKeyword::Genre(id)) => params.push(("with_genres", id.to_string())),
            Some(ProviderKeyword::Keyword(id)) => params.push(("with_keywords", id.to_string())),
            None => {}
        }
        params.push(("page", self.page.to_string()));
        params
    }

    /// Canonical signature of the query, used as a cache key.
    pub fn signature(&self) -> String {
        let mut params = self.to_params();
        params.sort();
        params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// A movie as returned by the provider.
///
/// Discover and similar results only fill the summary fields; credits,
/// keywords and runtime come from the details endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateMovie {
    /// Provider movie ID.
    pub id: u32,
    pub title: String,
    /// Release date (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Runtime in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_minutes: Option<u32>,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Top-billed cast, in billing order.
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub directors: Vec<String>,
    #[serde(default)]
    pub writers: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Provider popularity metric (unbounded, higher is more mainstream).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f32>,
    /// Average vote (0-10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    /// Poster path (relative to the image base URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
}

impl CandidateMovie {
    /// Get the release year from the release date.
    pub fn year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(|d| d.year())
    }

    /// Fill in fields from a details lookup.
    ///
    /// Details win where present; summary values are kept otherwise.
    pub fn merge_details(self, details: CandidateMovie) -> Self {
        fn pick_vec(detail: Vec<String>, base: Vec<String>) -> Vec<String> {
            if detail.is_empty() {
                base
            } else {
                detail
            }
        }

        Self {
            id: self.id,
            title: if details.title.is_empty() {
                self.title
            } else {
                details.title
            },
            release_date: details.release_date.or(self.release_date),
            runtime_minutes: details.runtime_minutes.or(self.runtime_minutes),
            genres: pick_vec(details.genres, self.genres),
            cast: pick_vec(details.cast, self.cast),
            directors: pick_vec(details.directors, self.directors),
            writers: pick_vec(details.writers, self.writers),
            keywords: pick_vec(details.keywords, self.keywords),
            popularity: details.popularity.or(self.popularity),
            vote_average: details.vote_average.or(self.vote_average),
            vote_count: details.vote_count.or(self.vote_count),
            overview: details.overview.or(self.overview),
            poster_path: details.poster_path.or(self.poster_path),
            backdrop_path: details.backdrop_path.or(self.backdrop_path),
        }
    }
}
