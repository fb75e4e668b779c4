//! Policy documents
//!
//! A policy is an ordered list of [`Statement`]s plus an optional version
//! string. It is owned by exactly one user and travels inside that user's
//! token claims.
//!
//! ## Security Constraints
//!
//! The following limits are enforced on every deserialized policy:
//! - `MAX_STATEMENTS_PER_POLICY` (1024): Maximum statements per policy
//! - `MAX_PATTERN_LENGTH` (256): Maximum action/resource pattern length
//!
//! An empty statement list is *not* rejected here. It is a valid document
//! that simply authorizes nothing, and the authorizer reports it with its own
//! error kind.

use crate::constraint::{Constraint, OneOrMany, RawConstraint};
use crate::error::{PolicyError, Result};
use crate::evaluator::{PolicyEvaluator, RequestTarget};
use crate::settings::MatchSettings;
use crate::statement::Statement;
use crate::MAX_STATEMENTS_PER_POLICY;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// A user's policy
///
/// # Security
///
/// Fields are private to enforce validation through deserialization.
/// The `#[serde(try_from)]` attribute ensures all deserialized policies
/// are validated against the size limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PolicyDocument")]
pub struct Policy {
    /// Free-form policy version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,

    /// Ordered statements
    statement: Vec<Statement>,
}

/// A policy as written, before its constraints are checked
///
/// Serde only checks the document's shape here. Constraint types and size
/// limits are checked by `Policy::try_from`, which reports them as typed
/// [`PolicyError`]s instead of the opaque message a failing `Deserialize`
/// impl is reduced to. Embedders that decode a policy nested in a larger
/// document deserialize this type and convert afterwards.
///
/// ```
/// use core_policy::{Policy, PolicyDocument, PolicyError};
///
/// let json = r#"{"statement":[{"action":"data:*","resource":"*",
///     "constraints":[{"type":"geo","value":"eu"}]}]}"#;
/// let document: PolicyDocument = serde_json::from_str(json).unwrap();
///
/// assert!(matches!(
///     Policy::try_from(document),
///     Err(PolicyError::UnknownConstraintType(kind)) if kind == "geo"
/// ));
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyDocument {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    statement: Vec<StatementDocument>,
}

#[derive(Debug, Clone, Deserialize)]
struct StatementDocument {
    action: OneOrMany<String>,
    resource: OneOrMany<String>,
    #[serde(default)]
    allow: Option<bool>,
    #[serde(default)]
    constraints: Vec<RawConstraint>,
}

impl TryFrom<StatementDocument> for Statement {
    type Error = PolicyError;

    fn try_from(raw: StatementDocument) -> Result<Self> {
        let constraints = raw
            .constraints
            .into_iter()
            .map(|constraint| Constraint::from_parts(&constraint.kind, constraint.value))
            .collect::<Result<Vec<_>>>()?;

        Ok(Statement {
            action: raw.action,
            resource: raw.resource,
            allow: raw.allow,
            constraints,
        })
    }
}

impl TryFrom<PolicyDocument> for Policy {
    type Error = PolicyError;

    fn try_from(raw: PolicyDocument) -> Result<Self> {
        if raw.statement.len() > MAX_STATEMENTS_PER_POLICY {
            return Err(PolicyError::TooManyStatements {
                max: MAX_STATEMENTS_PER_POLICY,
                attempted: raw.statement.len(),
            });
        }

        let policy = Policy {
            version: raw.version,
            statement: raw
                .statement
                .into_iter()
                .map(Statement::try_from)
                .collect::<Result<Vec<_>>>()?,
        };
        policy.validate()?;
        Ok(policy)
    }
}

impl Policy {
    // ===== Accessors =====

    /// Get the policy version
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Get the statements in declaration order
    #[must_use]
    pub fn statements(&self) -> &[Statement] {
        &self.statement
    }

    /// Whether the policy has no statements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statement.is_empty()
    }

    // ===== Constructors =====

    /// Create an empty, unversioned policy
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the version string
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Append a statement
    ///
    /// # Errors
    ///
    /// - `TooManyStatements` if the policy is already full
    /// - `PatternTooLong` if the statement carries an oversized pattern
    pub fn add_statement(mut self, statement: Statement) -> Result<Self> {
        if self.statement.len() >= MAX_STATEMENTS_PER_POLICY {
            return Err(PolicyError::TooManyStatements {
                max: MAX_STATEMENTS_PER_POLICY,
                attempted: self.statement.len() + 1,
            });
        }

        statement.validate()?;
        self.statement.push(statement);
        Ok(self)
    }

    /// Statements that allow `target`, or `None` when nothing does
    ///
    /// Delegates to [`PolicyEvaluator`].
    #[must_use]
    pub fn matching(
        &self,
        target: &RequestTarget<'_>,
        settings: &MatchSettings,
    ) -> Option<Vec<&Statement>> {
        PolicyEvaluator::new(&self.statement, settings).find(target)
    }

    /// Validate size limits
    ///
    /// # Errors
    ///
    /// - `TooManyStatements` if more than `MAX_STATEMENTS_PER_POLICY` statements
    /// - `PatternTooLong` if any pattern exceeds `MAX_PATTERN_LENGTH`
    pub fn validate(&self) -> Result<()> {
        if self.statement.len() > MAX_STATEMENTS_PER_POLICY {
            return Err(PolicyError::TooManyStatements {
                max: MAX_STATEMENTS_PER_POLICY,
                attempted: self.statement.len(),
            });
        }

        for statement in &self.statement {
            statement.validate()?;
        }

        Ok(())
    }

    /// Load policy from a JSON string
    ///
    /// # Errors
    ///
    /// - `SerializationError` if the JSON is malformed
    /// - `UnknownConstraintType` / `InvalidConstraintValue` for a bad constraint
    /// - `TooManyStatements` / `PatternTooLong` if a size limit is exceeded
    pub fn from_json(json: &str) -> Result<Self> {
        let document: PolicyDocument = serde_json::from_str(json)
            .map_err(|e| PolicyError::SerializationError(e.to_string()))?;
        Self::try_from(document)
    }

    /// Serialize policy to a JSON string
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::SerializationError` if serialization fails
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| PolicyError::SerializationError(e.to_string()))
    }

    /// Load policy from a TOML string
    ///
    /// # Errors
    ///
    /// Returns `TomlError` if the TOML is malformed, otherwise the same
    /// errors as [`Self::from_json`]
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let document: PolicyDocument = toml::from_str(toml_str)?;
        Self::try_from(document)
    }

    /// Serialize policy to a TOML string
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::SerializationError` if TOML serialization fails
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| PolicyError::SerializationError(e.to_string()))
    }
}

impl FromIterator<Statement> for Policy {
    fn from_iter<I: IntoIterator<Item = Statement>>(iter: I) -> Self {
        Self {
            version: None,
            statement: iter.into_iter().collect(),
        }
    }
}
