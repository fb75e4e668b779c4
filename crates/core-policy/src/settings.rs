//! Process-wide matcher settings
//!
//! Separators and the wildcard are configurable per deployment. They are
//! validated once at construction so the matcher never has to deal with an
//! empty separator.

use crate::error::{PolicyError, Result};
use alloc::string::{String, ToString};

/// Default separator between service and method in an action string
pub const DEFAULT_ACTION_SEPARATOR: &str = ":";

/// Default separator between database and collection in a resource string
pub const DEFAULT_RESOURCE_SEPARATOR: &str = ".";

/// Default wildcard token
pub const DEFAULT_WILDCARD: &str = "*";

/// Separators and wildcard used by statement matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSettings {
    action_separator: String,
    resource_separator: String,
    wildcard: String,
}

impl MatchSettings {
    /// Create settings from explicit values
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::InvalidSettings` if any value is empty
    pub fn new(
        action_separator: impl Into<String>,
        resource_separator: impl Into<String>,
        wildcard: impl Into<String>,
    ) -> Result<Self> {
        let settings = Self {
            action_separator: action_separator.into(),
            resource_separator: resource_separator.into(),
            wildcard: wildcard.into(),
        };

        if settings.action_separator.is_empty() {
            return Err(PolicyError::InvalidSettings(
                "action separator cannot be empty".to_string(),
            ));
        }
        if settings.resource_separator.is_empty() {
            return Err(PolicyError::InvalidSettings(
                "resource separator cannot be empty".to_string(),
            ));
        }
        if settings.wildcard.is_empty() {
            return Err(PolicyError::InvalidSettings(
                "wildcard cannot be empty".to_string(),
            ));
        }

        Ok(settings)
    }

    /// Separator between service and method
    #[must_use]
    pub fn action_separator(&self) -> &str {
        &self.action_separator
    }

    /// Separator between database and collection
    #[must_use]
    pub fn resource_separator(&self) -> &str {
        &self.resource_separator
    }

    /// Wildcard token
    #[must_use]
    pub fn wildcard(&self) -> &str {
        &self.wildcard
    }

    #[must_use]
    pub(crate) fn is_wildcard(&self, value: &str) -> bool {
        value == self.wildcard
    }
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            action_separator: DEFAULT_ACTION_SEPARATOR.to_string(),
            resource_separator: DEFAULT_RESOURCE_SEPARATOR.to_string(),
            wildcard: DEFAULT_WILDCARD.to_string(),
        }
    }
}
