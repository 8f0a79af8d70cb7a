//! Error types for scout configuration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use toml::de;

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// A setting holds a value that would make the engine inoperable.
    #[error("invalid setting {setting}: {message}")]
    InvalidSetting {
        /// Name of the offending setting.
        setting: &'static str,
        /// Why the value is rejected.
        message: String,
    },

    /// No platform data directory could be determined for snapshots.
    #[error("could not determine a data directory for snapshots")]
    NoDataDirectory,
}
