//! Configuration file loading with precedence handling.

use crate::state::{EngineConfig, PrefetchPolicy};
use crate::view_state::HeightCacheConfig;
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "REVIEW_FEED_CONFIG";

/// Environment variable overriding the page size.
pub const PAGE_SIZE_ENV_VAR: &str = "REVIEW_FEED_PAGE_SIZE";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A setting parsed but its value is out of range.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Name of the offending setting.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/review-feed/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Reviews requested per page.
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Viewport heights of remaining content that trigger a prefetch.
    #[serde(default)]
    pub prefetch_screens: Option<f64>,

    /// Initial line limit for review text (0 = unlimited).
    #[serde(default)]
    pub truncation_lines: Option<usize>,

    /// Upper bound on cached heights. Unbounded when absent.
    #[serde(default)]
    pub height_cache_capacity: Option<usize>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Reviews per page.
    pub page_size: usize,
    /// Prefetch distance in viewport heights.
    pub prefetch_screens: f64,
    /// Initial line limit for review text (0 = unlimited).
    pub truncation_lines: usize,
    /// Height cache bound; `None` means unbounded.
    pub height_cache_capacity: Option<usize>,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            page_size: engine.page_size.get(),
            prefetch_screens: engine.prefetch.screens(),
            truncation_lines: engine.truncation_lines,
            height_cache_capacity: engine.height_cache.capacity,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Check every value the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero page size or a negative
    /// or non-finite prefetch distance.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "page_size",
                reason: "must be at least 1".to_string(),
            });
        }

        if !self.prefetch_screens.is_finite() || self.prefetch_screens < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "prefetch_screens",
                reason: format!("must be a non-negative number (got {})", self.prefetch_screens),
            });
        }

        Ok(())
    }

    /// Engine settings for this configuration.
    ///
    /// # Errors
    ///
    /// Same as [`ResolvedConfig::validate`].
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        self.validate()?;

        let page_size = NonZeroUsize::new(self.page_size).ok_or(ConfigError::InvalidValue {
            field: "page_size",
            reason: "must be at least 1".to_string(),
        })?;

        Ok(EngineConfig {
            page_size,
            truncation_lines: self.truncation_lines,
            prefetch: PrefetchPolicy::new(self.prefetch_screens),
            height_cache: HeightCacheConfig {
                capacity: self.height_cache_capacity,
            },
        })
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/review-feed/review-feed.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("review-feed").join("review-feed.log")
    } else {
        PathBuf::from("review-feed.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/review-feed/config.toml` on Unix, appropriate path on
/// other platforms. Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("review-feed").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `REVIEW_FEED_CONFIG` environment variable
/// 3. Default path `~/.config/review-feed/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks `REVIEW_FEED_PAGE_SIZE`.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if the variable is set but is not an
/// unsigned integer.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(raw) = std::env::var(PAGE_SIZE_ENV_VAR) {
        config.page_size = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            field: "page_size",
            reason: format!("{PAGE_SIZE_ENV_VAR}={raw:?} is not an unsigned integer"),
        })?;
    }

    Ok(config)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        page_size: config.page_size.unwrap_or(defaults.page_size),
        prefetch_screens: config.prefetch_screens.unwrap_or(defaults.prefetch_screens),
        truncation_lines: config.truncation_lines.unwrap_or(defaults.truncation_lines),
        height_cache_capacity: config
            .height_cache_capacity
            .or(defaults.height_cache_capacity),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    page_size_override: Option<usize>,
) -> ResolvedConfig {
    if let Some(page_size) = page_size_override {
        config.page_size = page_size;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
