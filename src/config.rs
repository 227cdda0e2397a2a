//! Container configuration.
//!
//! Settings come from code (`Default` plus builder setters), from the
//! environment, or with the `config` feature from JSON.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{DiError, DiResult};

/// Default environment variable prefix.
pub const ENV_PREFIX: &str = "ANNO_DI_";

/// Default key the container itself resolves under.
pub const CONTAINER_KEY: &str = "container";

const DEFAULT_MAX_DEPTH: usize = 1024;

/// Behavior switches for a [`Container`](crate::Container).
///
/// # Examples
///
/// ```rust
/// use anno_di::{Container, ContainerConfig};
///
/// let config = ContainerConfig::default()
///     .with_max_depth(64)
///     .with_auto_register(false);
/// let container = Container::with_config(config);
/// assert_eq!(container.config().max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerConfig {
    /// Longest resolution chain before `DepthExceeded`
    pub max_depth: usize,
    /// Register unknown named types as factories on first resolution
    pub auto_register: bool,
    /// Pass the container as the sole argument to types declaring no dependencies
    pub implicit_container_argument: bool,
    /// Default argument caching for definitions that do not choose
    pub cache_arguments: bool,
    /// Key the container itself resolves under
    pub container_key: String,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            auto_register: true,
            implicit_container_argument: false,
            cache_arguments: false,
            container_key: CONTAINER_KEY.to_string(),
        }
    }
}

impl ContainerConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_auto_register(mut self, enabled: bool) -> Self {
        self.auto_register = enabled;
        self
    }

    pub fn with_implicit_container_argument(mut self, enabled: bool) -> Self {
        self.implicit_container_argument = enabled;
        self
    }

    pub fn with_cache_arguments(mut self, enabled: bool) -> Self {
        self.cache_arguments = enabled;
        self
    }

    pub fn with_container_key(mut self, key: impl Into<String>) -> Self {
        self.container_key = key.into();
        self
    }

    /// Defaults overridden by `ANNO_DI_*` environment variables.
    pub fn from_env() -> DiResult<Self> {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Defaults overridden by `{prefix}MAX_DEPTH`, `{prefix}AUTO_REGISTER`,
    /// `{prefix}IMPLICIT_CONTAINER`, `{prefix}CACHE_ARGUMENTS` and
    /// `{prefix}CONTAINER_KEY`.
    pub fn from_env_with_prefix(prefix: &str) -> DiResult<Self> {
        let mut config = Self::default();

        if let Some(raw) = read_var(prefix, "MAX_DEPTH") {
            config.max_depth = raw
                .parse()
                .map_err(|_| DiError::Config(format!("{}MAX_DEPTH must be an integer, got {:?}", prefix, raw)))?;
        }
        if let Some(raw) = read_var(prefix, "AUTO_REGISTER") {
            config.auto_register = parse_bool(prefix, "AUTO_REGISTER", &raw)?;
        }
        if let Some(raw) = read_var(prefix, "IMPLICIT_CONTAINER") {
            config.implicit_container_argument = parse_bool(prefix, "IMPLICIT_CONTAINER", &raw)?;
        }
        if let Some(raw) = read_var(prefix, "CACHE_ARGUMENTS") {
            config.cache_arguments = parse_bool(prefix, "CACHE_ARGUMENTS", &raw)?;
        }
        if let Some(raw) = read_var(prefix, "CONTAINER_KEY") {
            config.container_key = raw;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parses a JSON document; missing fields keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> DiResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| DiError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DiResult<()> {
        if self.max_depth == 0 {
            return Err(DiError::Config("max_depth must be greater than 0".to_string()));
        }
        if self.container_key.is_empty() {
            return Err(DiError::Config("container_key cannot be empty".to_string()));
        }
        Ok(())
    }
}

fn read_var(prefix: &str, name: &str) -> Option<String> {
    env::var(format!("{}{}", prefix, name)).ok()
}

fn parse_bool(prefix: &str, name: &str, raw: &str) -> DiResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(DiError::Config(format!("{}{} must be a boolean, got {:?}", prefix, name, raw))),
    }
}
