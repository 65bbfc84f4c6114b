//! Calibration sliders and the bucket tables they map to.
//!
//! Every slider value in 1..=10 falls in one of three buckets. The same
//! bucket drives both the provider-side discover filters and the
//! client-side hard ranges, so the two can never disagree.

mod filter;

pub use filter::CalibrationFilter;

use serde::{Deserialize, Serialize};

use crate::provider::{CandidateMovie, DiscoverFilters, SortOrder};

pub const SLIDER_MIN: u8 = 1;
pub const SLIDER_MAX: u8 = 10;

/// Inclusive numeric range; `None` leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    pub const fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: T) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Popularity bucket: client-side bounds plus the provider sort order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PopularityBand {
    pub max_popularity: Option<f32>,
    pub min_vote_average: Option<f32>,
    pub min_vote_count: Option<u32>,
    pub sort_by: SortOrder,
}

impl PopularityBand {
    /// `None` when the movie lacks a field this band needs.
    fn check(&self, movie: &CandidateMovie) -> Option<bool> {
        if let Some(max) = self.max_popularity {
            if movie.popularity? > max {
                return Some(false);
            }
        }
        if let Some(min) = self.min_vote_average {
            if movie.vote_average? < min {
                return Some(false);
            }
        }
        if let Some(min) = self.min_vote_count {
            if movie.vote_count? < min {
                return Some(false);
            }
        }
        Some(true)
    }

    pub fn admits(&self, movie: &CandidateMovie) -> bool {
        self.check(movie).unwrap_or(false)
    }
}

/// Release year buckets: classic, modern, recent.
pub const ERA_BUCKETS: [Bounds<i32>; 3] = [
    Bounds::new(None, Some(1980)),
    Bounds::new(Some(1980), Some(2010)),
    Bounds::new(Some(2010), None),
];

/// Runtime buckets in minutes: short, standard, long.
pub const RUNTIME_BUCKETS: [Bounds<u32>; 3] = [
    Bounds::new(None, Some(90)),
    Bounds::new(Some(90), Some(150)),
    Bounds::new(Some(150), None),
];

/// Popularity buckets: hidden gems, anything, acclaimed.
pub const POPULARITY_BUCKETS: [PopularityBand; 3] = [
    PopularityBand {
        max_popularity: Some(20.0),
        min_vote_average: None,
        min_vote_count: None,
        sort_by: SortOrder::PopularityAsc,
    },
    PopularityBand {
        max_popularity: None,
        min_vote_average: None,
        min_vote_count: None,
        sort_by: SortOrder::PopularityDesc,
    },
    PopularityBand {
        max_popularity: None,
        min_vote_average: Some(7.0),
        min_vote_count: Some(100),
        sort_by: SortOrder::VoteAverageDesc,
    },
];

/// Bucket index for a slider value: 1-3, 4-7, 8-10.
pub fn bucket(value: u8) -> usize {
    match value {
        0..=3 => 0,
        4..=7 => 1,
        _ => 2,
    }
}

fn default_slider() -> u8 {
    5
}

fn enabled() -> bool {
    true
}

/// The four calibration sliders of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationSettings {
    #[serde(default = "default_slider")]
    pub era: u8,
    #[serde(default = "default_slider")]
    pub runtime: u8,
    #[serde(default = "default_slider")]
    pub popularity: u8,
    #[serde(default = "default_slider")]
    pub familiarity: u8,
    #[serde(default = "enabled", alias = "eraEnabled")]
    pub era_enabled: bool,
    #[serde(default = "enabled", alias = "runtimeEnabled")]
    pub runtime_enabled: bool,
    #[serde(default = "enabled", alias = "popularityEnabled")]
    pub popularity_enabled: bool,
    #[serde(default = "enabled", alias = "familiarityEnabled")]
    pub familiarity_enabled: bool,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            era: default_slider(),
            runtime: default_slider(),
            popularity: default_slider(),
            familiarity: default_slider(),
            era_enabled: true,
            runtime_enabled: true,
            popularity_enabled: true,
            familiarity_enabled: true,
        }
    }
}

impl CalibrationSettings {
    pub fn new(era: u8, runtime: u8, popularity: u8, familiarity: u8) -> Self {
        Self {
            era,
            runtime,
            popularity,
            familiarity,
            ..Default::default()
        }
    }

    /// Check every slider is within 1..=10.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("era", self.era),
            ("runtime", self.runtime),
            ("popularity", self.popularity),
            ("familiarity", self.familiarity),
        ] {
            if !(SLIDER_MIN..=SLIDER_MAX).contains(&value) {
                return Err(format!(
                    "calibration_settings.{} must be between {} and {}, got {}",
                    name, SLIDER_MIN, SLIDER_MAX, value
                ));
            }
        }
        Ok(())
    }

    /// Hard ranges implied by the enabled sliders.
    pub fn ranges(&self) -> CalibrationRanges {
        CalibrationRanges {
            era: self.era_enabled.then(|| ERA_BUCKETS[bucket(self.era)]),
            runtime: self
                .runtime_enabled
                .then(|| RUNTIME_BUCKETS[bucket(self.runtime)]),
            popularity: self
                .popularity_enabled
                .then(|| POPULARITY_BUCKETS[bucket(self.popularity)]),
        }
    }

    /// Familiarity slider value, or `None` when disabled.
    pub fn familiarity(&self) -> Option<u8> {
        self.familiarity_enabled.then_some(self.familiarity)
    }
}

/// Hard ranges for one request. A `None` range is not applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationRanges {
    pub era: Option<Bounds<i32>>,
    pub runtime: Option<Bounds<u32>>,
    pub popularity: Option<PopularityBand>,
}

impl CalibrationRanges {
    /// Provider query filters for these ranges.
    pub fn discover_filters(&self) -> DiscoverFilters {
        let mut filters = DiscoverFilters::default();
        if let Some(era) = self.era {
            filters.min_year = era.min;
            filters.max_year = era.max;
        }
        if let Some(runtime) = self.runtime {
            filters.min_runtime = runtime.min;
            filters.max_runtime = runtime.max;
        }
        if let Some(band) = self.popularity {
            filters.min_vote_average = band.min_vote_average;
            filters.min_vote_count = band.min_vote_count;
            filters.sort_by = band.sort_by;
        }
        filters
    }

    /// Whether a movie falls inside every enabled range.
    ///
    /// A missing field required by an enabled range excludes the movie.
    pub fn admits(&self, movie: &CandidateMovie) -> bool {
        self.check(movie, false)
    }

    /// Like [`admits`](Self::admits), but an unknown runtime passes. For
    /// movies that came out of a discover query carrying these ranges.
    pub fn admits_prefiltered(&self, movie: &CandidateMovie) -> bool {
        self.check(movie, true)
    }

    fn check(&self, movie: &CandidateMovie, runtime_prefiltered: bool) -> bool {
        if let Some(era) = self.era {
            match movie.year() {
                Some(year) if era.contains(year) => {}
                _ => return false,
            }
        }
        if let Some(runtime) = self.runtime {
            match movie.runtime_minutes {
                Some(minutes) if runtime.contains(minutes) => {}
                None if runtime_prefiltered => {}
                _ => return false,
            }
        }
        if let Some(band) = self.popularity {
            if !band.admits(movie) {
                return false;
            }
        }
        true
    }
}
