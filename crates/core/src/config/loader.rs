use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides.
///
/// `TMDB_API_KEY` sets `tmdb.api_key`; `CINETAG_`-prefixed variables
/// override any key, with `__` separating sections
/// (e.g. `CINETAG_ENGINE__PER_TAG_LIMIT`).
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(
            Env::raw()
                .only(&["TMDB_API_KEY"])
                .map(|_| "tmdb.api_key".into()),
        )
        .merge(Env::prefixed("CINETAG_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
