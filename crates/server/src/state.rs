use std::sync::Arc;

use cinetag_core::{Config, Recommender, SanitizedConfig, TagTable};

/// Shared application state
pub struct AppState {
    config: Config,
    recommender: Arc<Recommender>,
}

impl AppState {
    pub fn new(config: Config, recommender: Arc<Recommender>) -> Self {
        Self {
            config,
            recommender,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn recommender(&self) -> &Recommender {
        self.recommender.as_ref()
    }

    pub fn tags(&self) -> &TagTable {
        self.recommender.tags()
    }
}
