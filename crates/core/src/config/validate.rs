use super::{types::Config, ConfigError};

/// Hard ceiling on results per request.
pub const MAX_RECOMMENDATIONS_LIMIT: usize = 100;

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Provider timeout and cache bounds are positive
/// - Engine limits are at least 1 and recommendation counts within 1..=100
/// - Weights are non-negative and the final score weights are not all zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(invalid("server.port cannot be 0"));
    }

    if config.tmdb.timeout_secs == 0 {
        return Err(invalid("tmdb.timeout_secs must be at least 1"));
    }

    if config.cache.ttl_secs == 0 {
        return Err(invalid("cache.ttl_secs must be at least 1"));
    }
    if config.cache.max_entries == 0 {
        return Err(invalid("cache.max_entries must be at least 1"));
    }

    let engine = &config.engine;
    for (name, value) in [
        ("per_tag_limit", engine.per_tag_limit),
        ("max_pages_per_tag", engine.max_pages_per_tag as usize),
        ("detail_concurrency", engine.detail_concurrency),
        ("max_tags", engine.max_tags),
        ("default_recommendations", engine.default_recommendations),
        ("max_recommendations", engine.max_recommendations),
    ] {
        if value == 0 {
            return Err(invalid(format!("engine.{} must be at least 1", name)));
        }
    }

    if engine.max_recommendations > MAX_RECOMMENDATIONS_LIMIT {
        return Err(invalid(format!(
            "engine.max_recommendations cannot exceed {}",
            MAX_RECOMMENDATIONS_LIMIT
        )));
    }
    if engine.default_recommendations > engine.max_recommendations {
        return Err(invalid(
            "engine.default_recommendations cannot exceed engine.max_recommendations",
        ));
    }

    if engine.popularity_ceiling <= 0.0 {
        return Err(invalid("engine.popularity_ceiling must be positive"));
    }

    let w = &engine.weights;
    if [w.tag, w.similarity, w.familiarity].iter().any(|v| *v < 0.0) {
        return Err(invalid("engine.weights cannot be negative"));
    }
    if w.tag + w.similarity + w.familiarity <= 0.0 {
        return Err(invalid("engine.weights cannot all be zero"));
    }
    if !(0.0..=1.0).contains(&w.tag_affinity_share) {
        return Err(invalid(
            "engine.weights.tag_affinity_share must be between 0 and 1",
        ));
    }

    let s = &engine.similarity;
    if s.as_slice().iter().any(|v| *v < 0.0) {
        return Err(invalid("engine.similarity weights cannot be negative"));
    }
    if !(0.0..=1.0).contains(&s.neutral) {
        return Err(invalid("engine.similarity.neutral must be between 0 and 1"));
    }

    Ok(())
}
