//! # app-utils
//!
//! Application-level utilities around the policy core.
//!
//! This crate provides non-core features:
//! - Gateway configuration (TOML / YAML files plus environment overrides)
//! - Policy document parsing from JSON, TOML and YAML

#![forbid(unsafe_code)]

pub mod config;
pub mod error;

pub mod parser {
    //! Policy document parsing
    use crate::error::{Error, Result};
    use core_policy::{Policy, PolicyDocument, PolicyError};
    use std::path::Path;

    /// Trait for policy parsers
    pub trait PolicyParser {
        /// Parse a policy from a string
        fn parse(&self, input: &str) -> std::result::Result<Policy, PolicyError>;
    }

    /// JSON parser implementation (the token claim format)
    pub struct JsonParser;

    impl PolicyParser for JsonParser {
        fn parse(&self, input: &str) -> std::result::Result<Policy, PolicyError> {
            Policy::from_json(input)
        }
    }

    /// TOML parser implementation
    pub struct TomlParser;

    impl PolicyParser for TomlParser {
        fn parse(&self, input: &str) -> std::result::Result<Policy, PolicyError> {
            Policy::from_toml(input)
        }
    }

    /// YAML parser implementation
    pub struct YamlParser;

    impl PolicyParser for YamlParser {
        fn parse(&self, input: &str) -> std::result::Result<Policy, PolicyError> {
            let document: PolicyDocument = serde_yaml::from_str(input)
                .map_err(|e| PolicyError::SerializationError(format!("YAML parse error: {}", e)))?;
            Policy::try_from(document)
        }
    }

    /// Parser for a file, chosen by its extension
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedFormat` for anything but `.json`, `.toml`,
    /// `.yaml` and `.yml`
    pub fn parser_for(path: &Path) -> Result<&'static dyn PolicyParser> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match ext.as_deref() {
            Some("json") => Ok(&JsonParser),
            Some("toml") => Ok(&TomlParser),
            Some("yaml" | "yml") => Ok(&YamlParser),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Read and parse a policy file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unsupported
    /// extension, or does not hold a valid policy
    pub fn load_policy(path: impl AsRef<Path>) -> Result<Policy> {
        let path = path.as_ref();
        let parser = parser_for(path)?;
        let input = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(parser.parse(&input)?)
    }
}

/// Re-export commonly used types
pub use config::GateConfig;
pub use error::{Error, Result};
pub use parser::{load_policy, JsonParser, PolicyParser, TomlParser, YamlParser};
