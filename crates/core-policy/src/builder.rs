//! Builder pattern for ergonomic policy construction

use crate::constraint::{Constraint, OneOrMany};
use crate::error::{PolicyError, Result};
use crate::policy::Policy;
use crate::statement::Statement;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Builder for creating `Statement` instances with a fluent API
///
/// A single action or resource is stored in scalar form, several in list form.
///
/// # Examples
///
/// ```
/// use core_policy::builder::StatementBuilder;
/// use core_policy::Constraint;
///
/// // Read access to every collection of one database
/// let statement = StatementBuilder::new()
///     .action("data:find")
///     .resource("acme.*")
///     .build()
///     .unwrap();
///
/// // Writes limited to the office network, at most 10 requests per window
/// let statement = StatementBuilder::new()
///     .action("data:insert")
///     .action("data:update")
///     .resource("acme.orders")
///     .constraint(Constraint::ip(vec!["10.0.0.1", "10.0.0.2"]))
///     .constraint(Constraint::max_requests(10))
///     .build()
///     .unwrap();
///
/// // Explicit deny
/// let statement = StatementBuilder::new()
///     .action("data:delete")
///     .resource("acme.*")
///     .deny()
///     .build()
///     .unwrap();
/// assert!(!statement.is_allowed());
/// ```
#[derive(Debug, Default)]
pub struct StatementBuilder {
    actions: Vec<String>,
    resources: Vec<String>,
    allow: Option<bool>,
    constraints: Vec<Constraint>,
}

impl StatementBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action (`<service>:<method>`)
    #[must_use]
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    /// Add a resource (`<db>.<collection>`)
    #[must_use]
    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resources.push(resource.into());
        self
    }

    /// Make the statement an explicit deny
    #[must_use]
    pub fn deny(mut self) -> Self {
        self.allow = Some(false);
        self
    }

    /// Attach a constraint
    #[must_use]
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Build the statement
    ///
    /// # Errors
    ///
    /// - `InvalidStatement` if no action or no resource was given
    /// - `PatternTooLong` if a pattern exceeds the length limit
    pub fn build(self) -> Result<Statement> {
        if self.actions.is_empty() {
            return Err(PolicyError::InvalidStatement(
                "at least one action is required".to_string(),
            ));
        }
        if self.resources.is_empty() {
            return Err(PolicyError::InvalidStatement(
                "at least one resource is required".to_string(),
            ));
        }

        let statement = Statement {
            action: collapse(self.actions),
            resource: collapse(self.resources),
            allow: self.allow,
            constraints: self.constraints,
        };
        statement.validate()?;
        Ok(statement)
    }
}

fn collapse(mut values: Vec<String>) -> OneOrMany<String> {
    if values.len() == 1 {
        OneOrMany::One(values.remove(0))
    } else {
        OneOrMany::Many(values)
    }
}

/// Builder for creating `Policy` instances with a fluent API
///
/// # Examples
///
/// ```
/// use core_policy::builder::{PolicyBuilder, StatementBuilder};
///
/// # fn example() -> Result<(), core_policy::PolicyError> {
/// let policy = PolicyBuilder::new()
///     .version("1.1.0")
///     .statement(StatementBuilder::new().action("data:*").resource("acme.*").build()?)
///     .build()?;
///
/// assert_eq!(policy.statements().len(), 1);
/// assert_eq!(policy.version(), Some("1.1.0"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct PolicyBuilder {
    version: Option<String>,
    statements: Vec<Statement>,
}

impl PolicyBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the policy version
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Add a statement
    #[must_use]
    pub fn statement(mut self, statement: Statement) -> Self {
        self.statements.push(statement);
        self
    }

    /// Build the policy
    ///
    /// # Errors
    ///
    /// Returns the first limit violation reported by `Policy::add_statement`
    pub fn build(self) -> Result<Policy> {
        let mut policy = Policy::new();
        if let Some(version) = self.version {
            policy = policy.with_version(version);
        }
        for statement in self.statements {
            policy = policy.add_statement(statement)?;
        }
        Ok(policy)
    }
}
