//! Tag table endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use cinetag_core::tags::normalize_tag;
use cinetag_core::{ProviderKeyword, TagCategory, TagDefinition, TagTableStatus};

use crate::state::AppState;

const DEFAULT_SEARCH_LIMIT: usize = 20;
const MAX_SEARCH_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct TagListQuery {
    pub category: Option<TagCategory>,
}

#[derive(Debug, Serialize)]
pub struct TagSummary {
    pub name: String,
    pub category: TagCategory,
    pub related_keywords: Vec<String>,
}

impl From<&TagDefinition> for TagSummary {
    fn from(def: &TagDefinition) -> Self {
        let own = normalize_tag(&def.name);
        Self {
            name: def.name.clone(),
            category: def.category,
            related_keywords: def
                .synonyms
                .iter()
                .filter(|s| normalize_tag(s) != own)
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TagListResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<TagCategory>,
    pub tags: Vec<TagSummary>,
    pub total: usize,
}

/// GET /api/v1/tags?category=
///
/// Built-in tags sorted by name. An unknown category is rejected with 400.
pub async fn list_tags(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TagListQuery>,
) -> Json<TagListResponse> {
    let table = state.tags();
    let tags: Vec<TagSummary> = match query.category {
        Some(category) => table
            .by_category(category)
            .into_iter()
            .map(TagSummary::from)
            .collect(),
        None => table
            .builtin_names()
            .into_iter()
            .filter_map(|name| table.lookup(name))
            .map(TagSummary::from)
            .collect(),
    };
    Json(TagListResponse {
        category: query.category,
        total: tags.len(),
        tags,
    })
}

#[derive(Debug, Serialize)]
pub struct KeywordStatusResponse {
    /// "loaded" when a keyword file was merged, otherwise "builtin_only".
    pub status: &'static str,
    #[serde(flatten)]
    pub table: TagTableStatus,
}

/// GET /api/v1/keywords/status
pub async fn keywords_status(State(state): State<Arc<AppState>>) -> Json<KeywordStatusResponse> {
    let table = state.tags().status();
    Json(KeywordStatusResponse {
        status: if table.keywords_file.is_some() {
            "loaded"
        } else {
            "builtin_only"
        },
        table,
    })
}

#[derive(Debug, Deserialize)]
pub struct KeywordSearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct KeywordMatch {
    pub name: String,
    pub id: u32,
    /// "genre" or "keyword"
    pub kind: &'static str,
}

impl From<&TagDefinition> for KeywordMatch {
    fn from(def: &TagDefinition) -> Self {
        let (id, kind) = match def.provider {
            ProviderKeyword::Genre(id) => (id, "genre"),
            ProviderKeyword::Keyword(id) => (id, "keyword"),
        };
        Self {
            name: def.name.clone(),
            id,
            kind,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct KeywordSearchResponse {
    pub query: String,
    pub results: Vec<KeywordMatch>,
    pub total_found: usize,
}

/// GET /api/v1/keywords/search?q=&limit=
pub async fn search_keywords(
    State(state): State<Arc<AppState>>,
    Query(query): Query<KeywordSearchQuery>,
) -> Json<KeywordSearchResponse> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .clamp(1, MAX_SEARCH_LIMIT);

    let results: Vec<KeywordMatch> = if query.q.trim().is_empty() {
        Vec::new()
    } else {
        state
            .tags()
            .search(&query.q, limit)
            .into_iter()
            .map(KeywordMatch::from)
            .collect()
    };

    Json(KeywordSearchResponse {
        total_found: results.len(),
        query: query.q,
        results,
    })
}
