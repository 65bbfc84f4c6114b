//! Testing utilities and mock implementations.
//!
//! This module provides a mock metadata provider so the whole
//! recommendation pipeline can be exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use cinetag_core::testing::{fixtures, MockMovieProvider};
//!
//! let provider = Arc::new(MockMovieProvider::new());
//! provider.set_discover(Some(ProviderKeyword::Genre(35)), fixtures::movies(1, 12)).await;
//!
//! let gateway = Arc::new(MetadataGateway::new(provider.clone(), GatewayConfig::default()));
//! let recommender = Recommender::new(gateway, Arc::new(TagTable::builtin()), EngineConfig::default());
//! ```

mod mock_provider;

pub use mock_provider::{MockMovieProvider, RecordedProviderQuery};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::provider::CandidateMovie;
    use crate::recommend::UserMovie;

    /// Create a test movie with reasonable defaults.
    ///
    /// Runtime is 110 minutes, votes 7.2 from 500 voters.
    pub fn movie(id: u32, title: &str, year: i32, popularity: f32) -> CandidateMovie {
        CandidateMovie {
            id,
            title: title.to_string(),
            release_date: Some(format!("{}-06-15", year)),
            runtime_minutes: Some(110),
            genres: vec!["Comedy".to_string()],
            popularity: Some(popularity),
            vote_average: Some(7.2),
            vote_count: Some(500),
            overview: Some(format!("{} is a test movie.", title)),
            poster_path: Some(format!("/poster{}.jpg", id)),
            ..Default::default()
        }
    }

    /// `count` movies with consecutive ids from `start_id`, all released
    /// in 2000 with distinct popularity.
    pub fn movies(start_id: u32, count: u32) -> Vec<CandidateMovie> {
        (start_id..start_id + count)
            .map(|id| movie(id, &format!("Movie {}", id), 2000, 5.0 + id as f32))
            .collect()
    }

    /// A movie with credits and keywords filled in.
    pub fn detailed_movie(
        id: u32,
        title: &str,
        cast: &[&str],
        directors: &[&str],
        keywords: &[&str],
    ) -> CandidateMovie {
        CandidateMovie {
            cast: to_strings(cast),
            directors: to_strings(directors),
            keywords: to_strings(keywords),
            ..movie(id, title, 2000, 30.0)
        }
    }

    /// A favourite movie as the user would submit it.
    pub fn user_movie(id: u32, cast: &[&str], directors: &[&str], keywords: &[&str]) -> UserMovie {
        UserMovie {
            id: Some(id),
            cast: to_strings(cast),
            directors: to_strings(directors),
            keywords: to_strings(keywords),
            ..Default::default()
        }
    }

    fn to_strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }
}
