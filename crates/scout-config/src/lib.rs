//! Configuration for the scout search engine.
//!
//! Configuration lives in a `scout.toml` file. Every setting has a
//! default, so a missing file yields a fully usable [`Config`]; a present
//! file overrides only the settings it names.

#![warn(missing_docs)]

mod error;
mod parse;

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
pub use error::ConfigError;
pub use parse::{RawCacheSettings, RawConfig, RawPersistSettings, RawSearchSettings};

/// Name of the configuration file.
pub const CONFIG_FILENAME: &str = "scout.toml";

/// Search behavior settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    /// Minimum length of the trimmed query text. Shorter queries are a
    /// validation error.
    pub min_query_length: usize,
    /// Whether fuzzy (edit-distance) term matching is enabled.
    pub fuzzy: bool,
    /// Ceiling on the number of candidates a single search considers.
    pub max_results: usize,
    /// Half-width, in characters, of highlight fragments.
    pub highlight_radius: usize,
    /// Whether stop words are removed during analysis.
    pub stop_words: bool,
    /// Whether suffix stemming is applied during analysis.
    pub stemming: bool,
    /// Domain-specific words filtered in addition to the standard
    /// English stop-word list.
    pub extra_stop_words: Vec<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            min_query_length: 2,
            fuzzy: true,
            max_results: 1000,
            highlight_radius: 30,
            stop_words: true,
            stemming: true,
            extra_stop_words: Vec::new(),
        }
    }
}

/// Query cache settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Seconds before a cached response expires.
    pub ttl_secs: u64,
    /// Entry count above which the oldest half of the cache is evicted.
    pub capacity: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            capacity: 1000,
        }
    }
}

/// Snapshot persistence settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistSettings {
    /// Seconds between background flushes of dirty index state.
    pub flush_interval_secs: u64,
    /// Directory holding the snapshot files. `None` means the platform
    /// data directory (see [`default_snapshot_dir`]).
    pub snapshot_dir: Option<PathBuf>,
}

impl Default for PersistSettings {
    fn default() -> Self {
        Self {
            flush_interval_secs: 60,
            snapshot_dir: None,
        }
    }
}

/// Fully resolved engine configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Search behavior settings.
    pub search: SearchSettings,
    /// Query cache settings.
    pub cache: CacheSettings,
    /// Snapshot persistence settings.
    pub persist: PersistSettings,
}

impl Config {
    /// Loads configuration from `path`, applying defaults for anything
    /// absent. A missing file yields `Config::default()`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = parse::parse_config_file(path)?;
        let config = raw.into_config();
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from a TOML string. Primarily for tests.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw = parse::parse_config_str(content)?;
        let config = raw.into_config();
        config.validate()?;
        Ok(config)
    }

    /// Resolves the snapshot directory, falling back to the platform
    /// default when none is configured.
    pub fn snapshot_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.persist.snapshot_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_snapshot_dir(),
        }
    }

    /// Rejects values that would make the engine inoperable.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.search.min_query_length == 0 {
            return Err(ConfigError::InvalidSetting {
                setting: "search.min_query_length",
                message: "must be at least 1".to_string(),
            });
        }
        if self.search.max_results == 0 {
            return Err(ConfigError::InvalidSetting {
                setting: "search.max_results",
                message: "must be at least 1".to_string(),
            });
        }
        if self.cache.capacity == 0 {
            return Err(ConfigError::InvalidSetting {
                setting: "cache.capacity",
                message: "must be at least 1".to_string(),
            });
        }
        if self.persist.flush_interval_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                setting: "persist.flush_interval_secs",
                message: "must be at least 1 second".to_string(),
            });
        }
        Ok(())
    }
}

/// Returns the platform-specific default snapshot directory.
pub fn default_snapshot_dir() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("", "", "scout").ok_or(ConfigError::NoDataDirectory)?;
    Ok(dirs.data_dir().join("index"))
}
