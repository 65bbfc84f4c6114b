pub mod calibration;
pub mod config;
pub mod gateway;
pub mod metrics;
pub mod provider;
pub mod recommend;
pub mod tags;
pub mod testing;

pub use calibration::{CalibrationFilter, CalibrationRanges, CalibrationSettings};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use gateway::{GatewayConfig, Lookup, MetadataGateway};
pub use provider::{
    CandidateMovie, DiscoverFilters, MovieProvider, ProviderError, ProviderKeyword, TmdbClient,
    TmdbConfig,
};
pub use recommend::{
    EngineConfig, Recommendation, RecommendationRequest, RecommendationResponse, RecommendError,
    Recommender, UserMovie,
};
pub use tags::{TagCategory, TagDefinition, TagTable, TagTableError, TagTableStatus};
