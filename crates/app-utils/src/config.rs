//! Gateway configuration
//!
//! Settings are read from a TOML or YAML file (every field optional), then
//! overridden by environment variables, then validated. The result converts
//! into the matcher settings used by policy evaluation.
//!
//! | Variable                              | Field                          |
//! |---------------------------------------|--------------------------------|
//! | `POLICY_STATEMENT_ACTION_SEPARATOR`   | `policy.action_separator`      |
//! | `POLICY_STATEMENT_RESOURCE_SEPARATOR` | `policy.resource_separator`    |
//! | `POLICY_STATEMENT_WILDCARD`           | `policy.wildcard`              |
//! | `CONSTRAINTS_DEFAULT_MAX_REQUESTS`    | `rate_limit.max_requests`      |
//! | `RATE_LIMIT_TIME_WINDOW`              | `rate_limit.time_window_ms`    |

use crate::error::{Error, Result};
use core_policy::settings::{
    DEFAULT_ACTION_SEPARATOR, DEFAULT_RESOURCE_SEPARATOR, DEFAULT_WILDCARD,
};
use core_policy::{MatchSettings, DEFAULT_MAX_REQUESTS, DEFAULT_TIME_WINDOW_MS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Environment variable overriding the action separator
pub const ENV_ACTION_SEPARATOR: &str = "POLICY_STATEMENT_ACTION_SEPARATOR";
/// Environment variable overriding the resource separator
pub const ENV_RESOURCE_SEPARATOR: &str = "POLICY_STATEMENT_RESOURCE_SEPARATOR";
/// Environment variable overriding the wildcard token
pub const ENV_WILDCARD: &str = "POLICY_STATEMENT_WILDCARD";
/// Environment variable overriding the default request budget
pub const ENV_MAX_REQUESTS: &str = "CONSTRAINTS_DEFAULT_MAX_REQUESTS";
/// Environment variable overriding the rate-limit window (milliseconds)
pub const ENV_TIME_WINDOW: &str = "RATE_LIMIT_TIME_WINDOW";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Policy statement syntax and document rules
    pub policy: PolicyConfig,
    /// Rate limiting defaults
    pub rate_limit: RateLimitConfig,
    /// Service resource names
    pub srn: SrnConfig,
}

/// Policy statement syntax and document rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Separator between service and method
    pub action_separator: String,
    /// Separator between database and collection
    pub resource_separator: String,
    /// Wildcard token
    pub wildcard: String,
    /// Actions a policy document may name
    pub action_values: Vec<String>,
    /// Databases no policy may grant access to
    pub reserved_databases: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            action_separator: DEFAULT_ACTION_SEPARATOR.to_string(),
            resource_separator: DEFAULT_RESOURCE_SEPARATOR.to_string(),
            wildcard: DEFAULT_WILDCARD.to_string(),
            action_values: [
                "admin:*",
                "data:*",
                "data:delete",
                "data:find",
                "data:insert",
                "data:update",
                "user:*",
                "user:activate",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            reserved_databases: vec!["coeus".to_string()],
        }
    }
}

/// Rate limiting defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Requests per window when no statement sets a budget
    pub max_requests: u64,
    /// Window length in milliseconds
    pub time_window_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            time_window_ms: DEFAULT_TIME_WINDOW_MS,
        }
    }
}

/// Service resource name settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SrnConfig {
    /// Namespace segment of every SRN
    pub namespace: String,
}

impl Default for SrnConfig {
    fn default() -> Self {
        Self {
            namespace: "coeus".to_string(),
        }
    }
}

impl GateConfig {
    /// Parse configuration from TOML
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlParseError` on malformed input
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Parse configuration from YAML
    ///
    /// # Errors
    ///
    /// Returns `Error::YamlParseError` on malformed input
    pub fn from_yaml_str(input: &str) -> Result<Self> {
        serde_yaml::from_str(input).map_err(|e| Error::YamlParseError(e.to_string()))
    }

    /// Load a file (format chosen by extension), apply environment
    /// overrides and validate
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, an override is
    /// malformed, or the result fails [`GateConfig::validate`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = match extension(path).as_deref() {
            Some("toml") => Self::from_toml_str(&input)?,
            Some("yaml" | "yml") => Self::from_yaml_str(&input)?,
            _ => return Err(Error::UnsupportedFormat(path.display().to_string())),
        };
        debug!(path = %path.display(), "loaded configuration file");

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with environment overrides, validated
    ///
    /// # Errors
    ///
    /// Same as [`GateConfig::apply_env`] and [`GateConfig::validate`]
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidEnv` if a numeric override does not parse
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidEnv` if a numeric override does not parse
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_ACTION_SEPARATOR) {
            self.policy.action_separator = value;
        }
        if let Some(value) = lookup(ENV_RESOURCE_SEPARATOR) {
            self.policy.resource_separator = value;
        }
        if let Some(value) = lookup(ENV_WILDCARD) {
            self.policy.wildcard = value;
        }
        if let Some(value) = lookup(ENV_MAX_REQUESTS) {
            self.rate_limit.max_requests = parse_number(ENV_MAX_REQUESTS, value)?;
        }
        if let Some(value) = lookup(ENV_TIME_WINDOW) {
            self.rate_limit.time_window_ms = parse_number(ENV_TIME_WINDOW, value)?;
        }
        Ok(())
    }

    /// Check the configuration is usable
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` for empty separators or wildcard, a
    /// separator equal to the wildcard, a zero request budget or window, or
    /// an empty SRN namespace
    pub fn validate(&self) -> Result<()> {
        let policy = &self.policy;
        for (name, value) in [
            ("policy.action_separator", &policy.action_separator),
            ("policy.resource_separator", &policy.resource_separator),
            ("policy.wildcard", &policy.wildcard),
            ("srn.namespace", &self.srn.namespace),
        ] {
            if value.is_empty() {
                return Err(Error::InvalidConfig(format!("{} must not be empty", name)));
            }
        }

        if policy.wildcard == policy.action_separator
            || policy.wildcard == policy.resource_separator
        {
            return Err(Error::InvalidConfig(
                "policy.wildcard must differ from both separators".to_string(),
            ));
        }

        if self.rate_limit.max_requests == 0 {
            return Err(Error::InvalidConfig(
                "rate_limit.max_requests must be positive".to_string(),
            ));
        }
        if self.rate_limit.time_window_ms == 0 {
            return Err(Error::InvalidConfig(
                "rate_limit.time_window_ms must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Matcher settings for policy evaluation
    ///
    /// # Errors
    ///
    /// Returns `Error::Policy` if a separator or the wildcard is empty
    pub fn match_settings(&self) -> Result<MatchSettings> {
        Ok(MatchSettings::new(
            self.policy.action_separator.as_str(),
            self.policy.resource_separator.as_str(),
            self.policy.wildcard.as_str(),
        )?)
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

fn parse_number(name: &'static str, value: String) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidEnv { name, value })
}
