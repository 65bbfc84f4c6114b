use tracing::debug;

use super::CalibrationRanges;
use crate::recommend::ScoredCandidate;

/// Hard cut on the enabled calibration ranges.
pub struct CalibrationFilter {
    ranges: CalibrationRanges,
}

impl CalibrationFilter {
    pub fn new(ranges: CalibrationRanges) -> Self {
        Self { ranges }
    }

    pub fn apply(&self, candidates: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
        let before = candidates.len();
        let kept: Vec<ScoredCandidate> = candidates
            .into_iter()
            .filter(|c| {
                if c.runtime_prefiltered {
                    self.ranges.admits_prefiltered(&c.movie)
                } else {
                    self.ranges.admits(&c.movie)
                }
            })
            .collect();
        debug!(
            "Calibration filter kept {} of {} candidates",
            kept.len(),
            before
        );
        kept
    }
}
