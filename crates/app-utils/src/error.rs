use core_policy::PolicyError;
use std::path::PathBuf;
use thiserror::Error;

/// Main errors for the `app-utils` crate
#[derive(Error, Debug)]
pub enum Error {
    /// A file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file extension maps to no supported format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// YAML parsing failed
    #[error("YAML parsing failed: {0}")]
    YamlParseError(String),

    /// TOML parsing failed
    #[error("TOML parsing failed: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// An environment override could not be applied
    #[error("Invalid value for {name}: {value:?}")]
    InvalidEnv {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
    },

    /// The configuration is internally inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A policy document failed to load or validate
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
