use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

use crate::gateway::GatewayConfig;
use crate::provider::TmdbConfig;
use crate::recommend::EngineConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub tags: TagsConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Config {
    /// Gateway settings derived from the cache, tmdb and engine sections.
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            cache_ttl: Duration::from_secs(self.cache.ttl_secs),
            cache_max_entries: self.cache.max_entries,
            call_timeout: Duration::from_secs(self.tmdb.timeout_secs),
            max_pages: self.engine.max_pages_per_tag,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Provider response cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Entry lifetime in seconds (default: one day).
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_max_entries() -> usize {
    10_000
}

/// Tag table configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TagsConfig {
    /// Optional `name,id` keyword CSV extending the built-in tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords_csv: Option<PathBuf>,
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub tmdb: SanitizedTmdbConfig,
    pub cache: CacheConfig,
    pub tags: TagsConfig,
    pub engine: EngineConfig,
}

/// Sanitized TMDB config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTmdbConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            tmdb: SanitizedTmdbConfig {
                base_url: config.tmdb.base_url.clone(),
                timeout_secs: config.tmdb.timeout_secs,
                api_key_configured: !config.tmdb.api_key.is_empty(),
            },
            cache: config.cache.clone(),
            tags: config.tags.clone(),
            engine: config.engine.clone(),
        }
    }
}
