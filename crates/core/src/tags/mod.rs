//! User-facing tags and their provider mappings.
//!
//! Tags are matched on a normalised key: case, surrounding whitespace and
//! `-`/`_`/space separators are ignored. Unknown tags are dropped, never
//! reported as errors.

mod defaults;
mod loader;

pub use loader::parse_keywords_csv;

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::provider::ProviderKeyword;

#[derive(Debug, Error)]
pub enum TagTableError {
    #[error("Keyword file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read keyword file: {0}")]
    Io(#[from] std::io::Error),
}

/// Normalise a tag for lookup.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim()
        .to_lowercase()
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Grouping shown to users when browsing tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagCategory {
    Mood,
    Genre,
    Emotion,
    Aesthetic,
    Theme,
    Vibe,
    /// Loaded from a keyword file.
    Keyword,
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TagCategory::Mood => "mood",
            TagCategory::Genre => "genre",
            TagCategory::Emotion => "emotion",
            TagCategory::Aesthetic => "aesthetic",
            TagCategory::Theme => "theme",
            TagCategory::Vibe => "vibe",
            TagCategory::Keyword => "keyword",
        };
        f.write_str(name)
    }
}

/// A tag known to the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagDefinition {
    /// Canonical display name.
    pub name: String,
    pub category: TagCategory,
    pub provider: ProviderKeyword,
    /// Lowercase words used to detect the tag in movie metadata.
    pub synonyms: Vec<String>,
    /// Whether the tag ships with the table (as opposed to a loaded keyword).
    pub builtin: bool,
}

/// A user tag that mapped to a provider reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTag {
    /// The tag as the user spelled it.
    pub tag: String,
    pub provider: ProviderKeyword,
    pub synonyms: Vec<String>,
}

/// Outcome of resolving a list of user tags.
#[derive(Debug, Clone, Default)]
pub struct TagResolution {
    pub resolved: Vec<ResolvedTag>,
    /// Tags with no mapping (original spelling).
    pub dropped: Vec<String>,
}

/// Counts reported by the keyword status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagTableStatus {
    pub builtin_tags: usize,
    pub loaded_keywords: usize,
    pub keywords_file: Option<PathBuf>,
}

/// Static lookup from tag names to provider references.
#[derive(Debug, Clone)]
pub struct TagTable {
    entries: BTreeMap<String, TagDefinition>,
    keywords_file: Option<PathBuf>,
}

impl Default for TagTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TagTable {
    /// The built-in table only.
    pub fn builtin() -> Self {
        let entries = defaults::BUILTIN_TAGS
            .iter()
            .map(|(name, category, provider, synonyms)| {
                (
                    normalize_tag(name),
                    TagDefinition {
                        name: name.to_string(),
                        category: *category,
                        provider: *provider,
                        synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
                        builtin: true,
                    },
                )
            })
            .collect();
        Self {
            entries,
            keywords_file: None,
        }
    }

    /// Built-in table extended with a `name,id` keyword CSV file.
    pub fn with_keywords_file(path: &Path) -> Result<Self, TagTableError> {
        if !path.exists() {
            return Err(TagTableError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let mut table = Self::builtin();
        let added = table.extend_keywords(parse_keywords_csv(&content));
        info!("Loaded {} keywords from {}", added, path.display());
        table.keywords_file = Some(path.to_path_buf());
        Ok(table)
    }

    /// Add keyword mappings. Existing entries win. Returns the number added.
    pub fn extend_keywords(&mut self, keywords: impl IntoIterator<Item = (String, u32)>) -> usize {
        let mut added = 0;
        for (name, id) in keywords {
            let key = normalize_tag(&name);
            if key.is_empty() || self.entries.contains_key(&key) {
                continue;
            }
            self.entries.insert(
                key.clone(),
                TagDefinition {
                    name: name.trim().to_string(),
                    category: TagCategory::Keyword,
                    provider: ProviderKeyword::Keyword(id),
                    synonyms: vec![key],
                    builtin: false,
                },
            );
            added += 1;
        }
        added
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, tag: &str) -> Option<&TagDefinition> {
        self.entries.get(&normalize_tag(tag))
    }

    /// Map user tags to provider references.
    ///
    /// Duplicates (same normalised key) collapse to the first spelling.
    pub fn resolve(&self, tags: &[String]) -> TagResolution {
        let mut seen = HashSet::new();
        let mut resolution = TagResolution::default();

        for tag in tags {
            let key = normalize_tag(tag);
            if !seen.insert(key.clone()) {
                continue;
            }
            match self.entries.get(&key) {
                Some(def) => resolution.resolved.push(ResolvedTag {
                    tag: tag.trim().to_string(),
                    provider: def.provider,
                    synonyms: def.synonyms.clone(),
                }),
                None => {
                    debug!("Dropping unmapped tag '{}'", tag);
                    resolution.dropped.push(tag.clone());
                }
            }
        }

        resolution
    }

    /// Names of the built-in tags, sorted.
    pub fn builtin_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .entries
            .values()
            .filter(|d| d.builtin)
            .map(|d| d.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Built-in tags in one category, sorted by name.
    pub fn by_category(&self, category: TagCategory) -> Vec<&TagDefinition> {
        let mut tags: Vec<&TagDefinition> = self
            .entries
            .values()
            .filter(|d| d.builtin && d.category == category)
            .collect();
        tags.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        tags
    }

    pub fn status(&self) -> TagTableStatus {
        let builtin_tags = self.entries.values().filter(|d| d.builtin).count();
        TagTableStatus {
            builtin_tags,
            loaded_keywords: self.entries.len() - builtin_tags,
            keywords_file: self.keywords_file.clone(),
        }
    }

    /// Case-insensitive substring search over tag names.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&TagDefinition> {
        let needle = normalize_tag(query);
        self.entries
            .iter()
            .filter(|(key, _)| key.contains(&needle))
            .map(|(_, def)| def)
            .take(limit)
            .collect()
    }
}
