//! Authorization decisions for a single request
//!
//! [`PolicyAuthorizer`] runs the full decision for one caller policy:
//!
//! 1. An empty policy is rejected outright (`PolicyInvalid`).
//! 2. The [`PolicyEvaluator`] finds the allowed statements; none means
//!    `PermissionDenied`.
//! 3. Source IP and hostname constraints of *all* matched statements are
//!    checked against the request context.
//! 4. The matched statements are returned so request budgets can be derived
//!    from them later.
//!
//! The decision is a pure function of its inputs: it performs no I/O and
//! keeps no state between calls.

use crate::constraint::{Candidate, Constraint, ConstraintKind};
use crate::error::{PolicyError, Result};
use crate::evaluator::{PolicyEvaluator, RequestTarget};
use crate::policy::Policy;
use crate::settings::MatchSettings;
use crate::statement::Statement;
use alloc::string::String;
use alloc::vec::Vec;

/// Network facts about the request being authorized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Source IP address as seen by the gateway
    pub source_ip: String,
    /// `Host` of the request, optionally with a `:port` suffix
    pub hostname: String,
}

impl RequestContext {
    /// Create a request context
    #[must_use]
    pub fn new(source_ip: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            source_ip: source_ip.into(),
            hostname: hostname.into(),
        }
    }
}

/// Evaluates a caller's policy against a request
///
/// ## Example
///
/// ```
/// use core_policy::{
///     Constraint, MatchSettings, Policy, PolicyAuthorizer, RequestContext, RequestTarget,
///     Statement,
/// };
///
/// let policy = Policy::new()
///     .add_statement(
///         Statement::new("data:find", "acme.*").with_constraint(Constraint::ip("10.0.0.1")),
///     )
///     .unwrap();
/// let settings = MatchSettings::default();
/// let authorizer = PolicyAuthorizer::new(&policy, &settings);
/// let target = RequestTarget::new("data", "find").on("acme", "users");
///
/// let office = RequestContext::new("10.0.0.1", "api.acme.io");
/// let elsewhere = RequestContext::new("10.0.0.2", "api.acme.io");
/// assert!(authorizer.authorize(&target, &office).is_ok());
/// assert!(authorizer.authorize(&target, &elsewhere).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PolicyAuthorizer<'a> {
    policy: &'a Policy,
    settings: &'a MatchSettings,
}

impl<'a> PolicyAuthorizer<'a> {
    /// Create a new authorizer for `policy`
    #[must_use]
    pub const fn new(policy: &'a Policy, settings: &'a MatchSettings) -> Self {
        Self { policy, settings }
    }

    /// Authorize `target` under `context`
    ///
    /// # Errors
    ///
    /// - `PolicyInvalid` if the policy has no statements
    /// - `PermissionDenied` if no allowed statement matches
    /// - `ConstraintViolationIp` / `ConstraintViolationHostname` if the matched
    ///   statements restrict the source and the request does not satisfy them
    pub fn authorize(
        &self,
        target: &RequestTarget<'_>,
        context: &RequestContext,
    ) -> Result<Vec<&'a Statement>> {
        if self.policy.is_empty() {
            return Err(PolicyError::PolicyInvalid);
        }

        let matched = PolicyEvaluator::new(self.policy.statements(), self.settings)
            .find(target)
            .ok_or(PolicyError::PermissionDenied)?;

        if !satisfies(ConstraintKind::Ip, &matched, &context.source_ip) {
            return Err(PolicyError::ConstraintViolationIp {
                ip: context.source_ip.clone(),
            });
        }

        if !satisfies(ConstraintKind::Hostname, &matched, &context.hostname) {
            return Err(PolicyError::ConstraintViolationHostname {
                hostname: context.hostname.clone(),
            });
        }

        Ok(matched)
    }

    /// Get the number of statements being evaluated
    #[must_use]
    pub fn statement_count(&self) -> usize {
        self.policy.statements().len()
    }
}

/// Whether `value` satisfies the `kind` constraints of the matched statements
///
/// Vacuously true when no matched statement carries a `kind` constraint;
/// otherwise one constraint of that kind, on any matched statement, must
/// accept `value`.
fn satisfies(kind: ConstraintKind, matched: &[&Statement], value: &str) -> bool {
    let mut constrained = matched
        .iter()
        .filter(|statement| Constraint::find(kind, &statement.constraints, None).is_some())
        .peekable();

    if constrained.peek().is_none() {
        return true;
    }

    constrained.any(|statement| {
        Constraint::find(kind, &statement.constraints, Some(Candidate::Text(value))).is_some()
    })
}

/// Trait for types that can authorize requests
///
/// This trait allows different authorization implementations to be used
/// interchangeably. Clients depend on this abstraction, not concrete types.
pub trait Authorizer {
    /// Authorize `target` and return the statements that allowed it
    ///
    /// # Errors
    ///
    /// Returns a denial (`PolicyError::is_denial`) when the request is not allowed
    fn authorize(
        &self,
        target: &RequestTarget<'_>,
        context: &RequestContext,
    ) -> Result<Vec<&Statement>>;
}

impl Authorizer for PolicyAuthorizer<'_> {
    fn authorize(
        &self,
        target: &RequestTarget<'_>,
        context: &RequestContext,
    ) -> Result<Vec<&Statement>> {
        PolicyAuthorizer::authorize(self, target, context)
    }
}
