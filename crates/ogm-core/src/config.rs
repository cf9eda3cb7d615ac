//! Configuration management for the OGM.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`OGM__` prefix, `__` separator, e.g. `OGM__NEO4J__URI`)
//! 2. Config file (`<prefix>.toml`, optional)
//! 3. Defaults

use serde::Deserialize;

use crate::error::ConfigError;

/// How database errors of delete, update and find operations reach the caller.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Report the error to the logging hook and return an empty result.
    #[default]
    Soft,
    /// Return the error to the caller.
    Strict,
}

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default = "default_password")]
    pub password: String,

    /// Target database; the server default when unset.
    #[serde(default)]
    pub database: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,
}

/// Top-level OGM configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OgmConfig {
    #[serde(default)]
    pub neo4j: GraphConfig,

    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_password() -> String {
    "neo4j".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password: default_password(),
            database: None,
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
        }
    }
}

impl OgmConfig {
    /// Load configuration from `<file_prefix>.toml` (if present) and `OGM__` variables.
    pub fn load(file_prefix: &str) -> Result<Self, ConfigError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("OGM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = cfg.try_deserialize()?;
        tracing::debug!(
            uri = %loaded.neo4j.uri,
            policy = ?loaded.failure_policy,
            "Loaded OGM configuration"
        );
        Ok(loaded)
    }

    /// Parse configuration from TOML text, without consulting the environment.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let cfg = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }
}
