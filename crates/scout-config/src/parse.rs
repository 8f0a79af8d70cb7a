//! Raw TOML deserialization.
//!
//! Raw structs mirror the file format with every field optional; defaults
//! are applied when converting into the resolved [`Config`](crate::Config).

use std::{fs, path::Path, path::PathBuf};

use serde::Deserialize;

use crate::{CacheSettings, Config, ConfigError, PersistSettings, SearchSettings};

/// Raw `[search]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSearchSettings {
    /// Minimum trimmed query length.
    pub min_query_length: Option<usize>,
    /// Fuzzy matching toggle.
    pub fuzzy: Option<bool>,
    /// Candidate ceiling per search.
    pub max_results: Option<usize>,
    /// Highlight fragment half-width.
    pub highlight_radius: Option<usize>,
    /// Stop-word removal toggle.
    pub stop_words: Option<bool>,
    /// Stemming toggle.
    pub stemming: Option<bool>,
    /// Additional stop words.
    pub extra_stop_words: Option<Vec<String>>,
}

/// Raw `[cache]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawCacheSettings {
    /// Entry TTL in seconds.
    pub ttl_secs: Option<u64>,
    /// Eviction threshold.
    pub capacity: Option<usize>,
}

/// Raw `[persist]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawPersistSettings {
    /// Flush interval in seconds.
    pub flush_interval_secs: Option<u64>,
    /// Snapshot directory override.
    pub snapshot_dir: Option<PathBuf>,
}

/// A parsed-but-unresolved configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    /// `[search]` section.
    #[serde(default)]
    pub search: RawSearchSettings,
    /// `[cache]` section.
    #[serde(default)]
    pub cache: RawCacheSettings,
    /// `[persist]` section.
    #[serde(default)]
    pub persist: RawPersistSettings,
}

impl RawConfig {
    /// Applies defaults to produce a resolved configuration.
    pub fn into_config(self) -> Config {
        let search_defaults = SearchSettings::default();
        let cache_defaults = CacheSettings::default();
        let persist_defaults = PersistSettings::default();

        Config {
            search: SearchSettings {
                min_query_length: self
                    .search
                    .min_query_length
                    .unwrap_or(search_defaults.min_query_length),
                fuzzy: self.search.fuzzy.unwrap_or(search_defaults.fuzzy),
                max_results: self.search.max_results.unwrap_or(search_defaults.max_results),
                highlight_radius: self
                    .search
                    .highlight_radius
                    .unwrap_or(search_defaults.highlight_radius),
                stop_words: self.search.stop_words.unwrap_or(search_defaults.stop_words),
                stemming: self.search.stemming.unwrap_or(search_defaults.stemming),
                extra_stop_words: self.search.extra_stop_words.unwrap_or_default(),
            },
            cache: CacheSettings {
                ttl_secs: self.cache.ttl_secs.unwrap_or(cache_defaults.ttl_secs),
                capacity: self.cache.capacity.unwrap_or(cache_defaults.capacity),
            },
            persist: PersistSettings {
                flush_interval_secs: self
                    .persist
                    .flush_interval_secs
                    .unwrap_or(persist_defaults.flush_interval_secs),
                snapshot_dir: self.persist.snapshot_dir,
            },
        }
    }
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a configuration string.
pub fn parse_config_str(contents: &str) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: PathBuf::from("<string>"),
        source,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_string_parses_to_all_none() {
        let raw = parse_config_str("").unwrap();
        assert!(raw.search.min_query_length.is_none());
        assert!(raw.cache.ttl_secs.is_none());
        assert!(raw.persist.snapshot_dir.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse_config_str("[search]\nturbo = true\n").unwrap_err();
        assert!(err.to_string().contains("parse"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(parse_config_str("[search\n").is_err());
    }
}
