//! Known-movie removal and familiarity scoring.

use std::collections::HashSet;

use tracing::debug;

use super::types::{Candidate, ScoredCandidate};

/// Familiarity score in [0, 1].
///
/// `p` is log-scaled popularity against `ceiling`. The slider tilts the
/// score towards obscure titles below 5 and towards mainstream titles above
/// 6; 5 and 6 are flat at 0.5. `None` (slider disabled) is also flat.
pub fn familiarity_score(popularity: Option<f32>, slider: Option<u8>, ceiling: f64) -> f64 {
    let Some(slider) = slider else {
        return 0.5;
    };

    let bias = match slider {
        0..=4 => (f64::from(slider) - 5.0) / 4.0,
        5 | 6 => 0.0,
        _ => (f64::from(slider.min(10)) - 6.0) / 4.0,
    };

    let popularity = f64::from(popularity.unwrap_or(0.0)).max(0.0);
    let p = if ceiling > 0.0 {
        ((1.0 + popularity).ln() / (1.0 + ceiling).ln()).clamp(0.0, 1.0)
    } else {
        0.0
    };

    (0.5 + 0.5 * bias * (2.0 * p - 1.0)).clamp(0.0, 1.0)
}

pub struct FamiliarityFilter {
    known: HashSet<u32>,
    slider: Option<u8>,
    popularity_ceiling: f64,
    neutral_similarity: f64,
}

impl FamiliarityFilter {
    pub fn new(
        known: HashSet<u32>,
        slider: Option<u8>,
        popularity_ceiling: f64,
        neutral_similarity: f64,
    ) -> Self {
        Self {
            known,
            slider,
            popularity_ceiling,
            neutral_similarity,
        }
    }

    /// Drop known movies and score the rest.
    pub fn apply(&self, candidates: Vec<Candidate>) -> Vec<ScoredCandidate> {
        let before = candidates.len();
        let scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .filter(|c| !self.known.contains(&c.movie.id))
            .map(|c| {
                let score =
                    familiarity_score(c.movie.popularity, self.slider, self.popularity_ceiling);
                ScoredCandidate::new(c, score, self.neutral_similarity)
            })
            .collect();

        debug!(
            "Familiarity filter removed {} known movies",
            before - scored.len()
        );
        scored
    }
}
