//! Final scoring, ordering and truncation.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::config::ScoringWeights;
use super::types::{Recommendation, ScoredCandidate};
use crate::provider::CandidateMovie;
use crate::tags::ResolvedTag;

pub struct Ranker {
    weights: ScoringWeights,
    /// Resolved tag count; 0 on the discovery path.
    tag_count: usize,
    /// Synonyms by tag as the user spelled it.
    synonyms: HashMap<String, Vec<String>>,
}

impl Ranker {
    pub fn new(weights: ScoringWeights, tags: &[ResolvedTag]) -> Self {
        Self {
            weights,
            tag_count: tags.len(),
            synonyms: tags
                .iter()
                .map(|t| (t.tag.clone(), t.synonyms.clone()))
                .collect(),
        }
    }

    /// Fraction of resolved tags that surfaced the candidate.
    fn coverage(&self, candidate: &ScoredCandidate) -> f64 {
        if self.tag_count == 0 {
            return 0.0;
        }
        (candidate.source_tags.len() as f64 / self.tag_count as f64).min(1.0)
    }

    /// Fraction of the candidate's source tags whose synonyms show up in its
    /// keywords, genres or overview.
    fn affinity(&self, candidate: &ScoredCandidate) -> f64 {
        if candidate.source_tags.is_empty() {
            return 0.0;
        }
        let text = MetadataText::new(&candidate.movie);
        let matched = candidate
            .source_tags
            .iter()
            .filter(|tag| {
                self.synonyms
                    .get(*tag)
                    .is_some_and(|words| words.iter().any(|w| text.mentions(w)))
            })
            .count();
        matched as f64 / candidate.source_tags.len() as f64
    }

    fn tag_component(&self, candidate: &ScoredCandidate) -> f64 {
        let share = self.weights.tag_affinity_share.clamp(0.0, 1.0);
        (1.0 - share) * self.coverage(candidate) + share * self.affinity(candidate)
    }

    /// Weighted combination of the components, normalised by the total
    /// weight so the result stays in [0, 1].
    pub fn final_score(&self, candidate: &ScoredCandidate) -> f64 {
        let w = &self.weights;
        let total = w.tag + w.similarity + w.familiarity;
        if total <= 0.0 {
            return 0.0;
        }
        let score = w.tag * self.tag_component(candidate)
            + w.similarity * candidate.similarity_score
            + w.familiarity * candidate.familiarity_score;
        (score / total).clamp(0.0, 1.0)
    }

    /// Score, sort and keep the best `max_results`.
    pub fn rank(&self, candidates: Vec<ScoredCandidate>, max_results: usize) -> Vec<Recommendation> {
        let mut scored: Vec<(f64, ScoredCandidate)> = candidates
            .into_iter()
            .map(|c| (self.final_score(&c), c))
            .collect();

        scored.sort_by(|(score_a, a), (score_b, b)| {
            score_b
                .total_cmp(score_a)
                .then_with(|| compare_popularity_desc(&a.movie, &b.movie))
                .then_with(|| a.movie.title.cmp(&b.movie.title))
                .then_with(|| a.movie.id.cmp(&b.movie.id))
        });
        scored.truncate(max_results);

        scored
            .into_iter()
            .map(|(score, c)| Recommendation::new(c, score))
            .collect()
    }
}

fn compare_popularity_desc(a: &CandidateMovie, b: &CandidateMovie) -> Ordering {
    let a = a.popularity.unwrap_or(0.0);
    let b = b.popularity.unwrap_or(0.0);
    b.total_cmp(&a)
}

/// Lowercase words of a phrase; anything not alphanumeric separates words.
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Searchable metadata of a movie, one word list per keyword, genre and
/// the overview, so a match never spans two keywords.
struct MetadataText {
    phrases: Vec<Vec<String>>,
}

impl MetadataText {
    fn new(movie: &CandidateMovie) -> Self {
        Self {
            phrases: movie
                .keywords
                .iter()
                .chain(movie.genres.iter())
                .map(String::as_str)
                .chain(movie.overview.as_deref())
                .map(words)
                .collect(),
        }
    }

    /// Whether `term` appears as whole consecutive words.
    fn mentions(&self, term: &str) -> bool {
        let needle = words(term);
        if needle.is_empty() {
            return false;
        }
        self.phrases
            .iter()
            .any(|phrase| phrase.windows(needle.len()).any(|w| w == needle.as_slice()))
    }
}
