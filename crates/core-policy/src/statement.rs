//! Policy statements and their matching rules
//!
//! A statement names actions (`<service>:<method>`) and resources
//! (`<db>.<collection>`). Matching is deliberately narrow:
//!
//! - The wildcard is honoured on the method and collection side only. A
//!   service or database is always compared exactly.
//! - A resource that *is* the wildcard matches everything, including requests
//!   whose resource strings carry no separator at all.
//! - All comparisons are case-insensitive.
//! - An empty action or resource list matches nothing.
//!
//! Matching never allocates, so it is cheap enough to run on every request.

use crate::constraint::{Constraint, OneOrMany};
use crate::error::{PolicyError, Result};
use crate::settings::MatchSettings;
use crate::MAX_PATTERN_LENGTH;
use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// A single rule of a policy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    /// Action(s) this statement covers, `<service><sep><method>`
    pub action: OneOrMany<String>,

    /// Resource(s) this statement covers, `<db><sep><collection>`
    pub resource: OneOrMany<String>,

    /// `Some(false)` marks an explicit deny; absent means allow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow: Option<bool>,

    /// Extra runtime conditions, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
}

impl Statement {
    /// Create an allowing statement without constraints
    #[must_use]
    pub fn new(
        action: impl Into<OneOrMany<String>>,
        resource: impl Into<OneOrMany<String>>,
    ) -> Self {
        Self {
            action: action.into(),
            resource: resource.into(),
            allow: None,
            constraints: Vec::new(),
        }
    }

    /// Mark this statement as an explicit deny
    #[must_use]
    pub fn deny(mut self) -> Self {
        self.allow = Some(false);
        self
    }

    /// Attach a constraint
    #[must_use]
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Whether this statement grants access when it matches
    ///
    /// Only an explicit `allow: false` denies; a missing flag allows.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.allow != Some(false)
    }

    /// Check if any action of this statement covers `service` and `method`
    #[must_use]
    pub fn matches_service_method(
        &self,
        service: &str,
        method: &str,
        settings: &MatchSettings,
    ) -> bool {
        self.action
            .iter()
            .any(|action| action_matches(action, service, method, settings))
    }

    /// Check if any resource of this statement covers `db` and `collection`
    ///
    /// Requests that are not collection-scoped (no database or no collection)
    /// match every statement on the resource side.
    #[must_use]
    pub fn matches_collection_database(
        &self,
        db: Option<&str>,
        collection: Option<&str>,
        settings: &MatchSettings,
    ) -> bool {
        let (Some(db), Some(collection)) = (db, collection) else {
            return true;
        };

        self.resource
            .iter()
            .any(|resource| resource_matches(resource, db, collection, settings))
    }

    /// Check pattern lengths against `MAX_PATTERN_LENGTH`
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::PatternTooLong` for the first oversized pattern
    pub fn validate(&self) -> Result<()> {
        for pattern in self.action.iter().chain(self.resource.iter()) {
            if pattern.len() > MAX_PATTERN_LENGTH {
                return Err(PolicyError::PatternTooLong {
                    max: MAX_PATTERN_LENGTH,
                    length: pattern.len(),
                });
            }
        }
        Ok(())
    }
}

fn action_matches(action: &str, service: &str, method: &str, settings: &MatchSettings) -> bool {
    let mut parts = action.split(settings.action_separator());
    let (Some(policy_service), Some(policy_method)) = (parts.next(), parts.next()) else {
        return false;
    };

    eq_ignore_case(policy_service, service)
        && (settings.is_wildcard(policy_method) || eq_ignore_case(policy_method, method))
}

fn resource_matches(resource: &str, db: &str, collection: &str, settings: &MatchSettings) -> bool {
    if settings.is_wildcard(resource) {
        return true;
    }

    let mut parts = resource.split(settings.resource_separator());
    let (Some(policy_db), Some(policy_collection)) = (parts.next(), parts.next()) else {
        return false;
    };

    eq_ignore_case(policy_db, db)
        && (settings.is_wildcard(policy_collection)
            || eq_ignore_case(policy_collection, collection))
}

/// Unicode-aware case-insensitive comparison without allocating
fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn settings() -> MatchSettings {
        MatchSettings::default()
    }

    #[test]
    fn test_eq_ignore_case() {
        assert!(eq_ignore_case("Data", "dATA"));
        assert!(eq_ignore_case("", ""));
        assert!(!eq_ignore_case("data", "datas"));
        assert!(eq_ignore_case("ÄCME", "äcme"));
    }

    #[test]
    fn test_action_without_separator_never_matches() {
        let statement = Statement::new("data", "*");
        assert!(!statement.matches_service_method("data", "find", &settings()));
    }

    #[test]
    fn test_action_extra_segments_ignored() {
        let statement = Statement::new("data:find:extra", "*");
        assert!(statement.matches_service_method("data", "find", &settings()));
    }

    #[test]
    fn test_resource_without_separator_only_matches_as_wildcard() {
        let statement = Statement::new("data:*", "acme");
        assert!(!statement.matches_collection_database(Some("acme"), Some("users"), &settings()));
    }

    #[test]
    fn test_wildcard_service_is_literal() {
        let statement = Statement::new("*:find", "*");
        assert!(!statement.matches_service_method("data", "find", &settings()));
        assert!(statement.matches_service_method("*", "find", &settings()));
    }

    #[test]
    fn test_wildcard_db_is_literal() {
        let statement = Statement::new("data:*", "*.users");
        assert!(!statement.matches_collection_database(Some("acme"), Some("users"), &settings()));
    }

    #[test]
    fn test_empty_lists_never_match() {
        let statement = Statement::new(Vec::<String>::new(), Vec::<String>::new());
        assert!(!statement.matches_service_method("data", "find", &settings()));
        assert!(!statement.matches_collection_database(Some("acme"), Some("x"), &settings()));
    }

    #[test]
    fn test_missing_scope_is_vacuous() {
        let statement = Statement::new("data:find", vec!["other.thing"]);
        assert!(statement.matches_collection_database(None, Some("x"), &settings()));
        assert!(statement.matches_collection_database(Some("acme"), None, &settings()));
    }

    #[test]
    fn test_pattern_too_long() {
        let long = "a".repeat(MAX_PATTERN_LENGTH + 1);
        let statement = Statement::new(long.as_str(), "*");
        assert!(matches!(
            statement.validate(),
            Err(PolicyError::PatternTooLong { .. })
        ));
    }
}
