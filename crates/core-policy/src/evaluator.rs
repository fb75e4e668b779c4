//! Policy evaluation across all statements of a policy
//!
//! The evaluator answers one question: which statements allow this request?
//! It returns every such statement, not just a yes/no, because constraints
//! and request budgets are combined across all of them afterwards.
//!
//! ## Deny semantics
//!
//! Statements with an explicit `allow: false` are removed from the candidate
//! set *before* matching. A deny statement therefore never appears in the
//! result and never overrides another statement that allows the request.

use crate::settings::MatchSettings;
use crate::statement::Statement;
use alloc::vec::Vec;

/// The operation a caller wants to perform
///
/// `db` and `collection` are optional because some operations (index listing
/// on a server, user management) are not collection-scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTarget<'a> {
    /// Service handling the request (e.g. `data`)
    pub service: &'a str,
    /// Method within the service (e.g. `find`)
    pub method: &'a str,
    /// Target database
    pub db: Option<&'a str>,
    /// Target collection
    pub collection: Option<&'a str>,
}

impl<'a> RequestTarget<'a> {
    /// Target an operation that is not collection-scoped
    #[must_use]
    pub const fn new(service: &'a str, method: &'a str) -> Self {
        Self {
            service,
            method,
            db: None,
            collection: None,
        }
    }

    /// Scope the target to a database and collection
    #[must_use]
    pub const fn on(mut self, db: &'a str, collection: &'a str) -> Self {
        self.db = Some(db);
        self.collection = Some(collection);
        self
    }
}

/// Finds the statements of a policy that allow a request
///
/// ## Example
///
/// ```
/// use core_policy::{MatchSettings, PolicyEvaluator, RequestTarget, Statement};
///
/// let statements = vec![Statement::new("data:*", "acme.*")];
/// let settings = MatchSettings::default();
/// let evaluator = PolicyEvaluator::new(&statements, &settings);
///
/// let target = RequestTarget::new("data", "find").on("acme", "users");
/// assert_eq!(evaluator.find(&target).map(|m| m.len()), Some(1));
///
/// let target = RequestTarget::new("data", "find").on("other", "users");
/// assert!(evaluator.find(&target).is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PolicyEvaluator<'a, 's> {
    statements: &'a [Statement],
    settings: &'s MatchSettings,
}

impl<'a, 's> PolicyEvaluator<'a, 's> {
    /// Create an evaluator over `statements`
    ///
    /// Matched statements borrow from `statements` only, so they may outlive
    /// `settings`.
    #[must_use]
    pub const fn new(statements: &'a [Statement], settings: &'s MatchSettings) -> Self {
        Self {
            statements,
            settings,
        }
    }

    /// All allowed statements matching `target`, in declaration order
    ///
    /// Returns `None` when no statement matches; callers treat that as a denial.
    #[must_use]
    pub fn find(&self, target: &RequestTarget<'_>) -> Option<Vec<&'a Statement>> {
        let matched: Vec<&'a Statement> = self.matching(target).collect();

        if matched.is_empty() {
            None
        } else {
            Some(matched)
        }
    }

    /// Lazily iterate over the allowed statements matching `target`
    pub fn matching<'t>(
        &self,
        target: &'t RequestTarget<'t>,
    ) -> impl Iterator<Item = &'a Statement> + 't
    where
        'a: 't,
        's: 't,
    {
        let settings: &'t MatchSettings = self.settings;
        self.statements
            .iter()
            .filter(|statement| statement.is_allowed())
            .filter(move |statement| {
                statement.matches_service_method(target.service, target.method, settings)
                    && statement.matches_collection_database(target.db, target.collection, settings)
            })
    }

    /// Check if at least one statement allows `target`
    #[must_use]
    pub fn is_allowed(&self, target: &RequestTarget<'_>) -> bool {
        self.matching(target).next().is_some()
    }

    /// Get the number of statements being evaluated
    #[must_use]
    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }
}
