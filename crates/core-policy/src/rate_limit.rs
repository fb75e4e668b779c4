//! Request budget derivation
//!
//! The rate limiter runs before request bodies are validated, so it cannot
//! rely on an earlier authorization pass. [`derive_rate_limit`] therefore
//! re-runs statement matching for the incoming target on its own.
//!
//! The budget is the value of the *first* `maxRequests` constraint found when
//! scanning the matched statements in declaration order. It is not the
//! global minimum across statements: policy authors control precedence by
//! ordering their statements.

use crate::constraint::{Constraint, ConstraintKind};
use crate::evaluator::{PolicyEvaluator, RequestTarget};
use crate::settings::MatchSettings;
use crate::statement::Statement;
use alloc::string::String;
use core::fmt;

/// Requests allowed per window when no statement sets a budget
pub const DEFAULT_MAX_REQUESTS: u64 = 60;

/// Rate-limit window in milliseconds when none is configured
pub const DEFAULT_TIME_WINDOW_MS: u64 = 60_000;

/// Budget carried by the first matched statement that has one
///
/// Within that statement the first `maxRequests` constraint with a value wins;
/// a list value contributes its smallest element and an empty list is skipped.
#[must_use]
pub fn first_request_budget(matched: &[&Statement]) -> Option<u64> {
    matched.iter().find_map(|statement| {
        statement
            .constraints
            .iter()
            .filter(|constraint| constraint.kind() == ConstraintKind::MaxRequests)
            .find_map(Constraint::request_budget)
    })
}

/// Requests allowed per window for `target`, falling back to `default`
///
/// ## Example
///
/// ```
/// use core_policy::{derive_rate_limit, Constraint, MatchSettings, RequestTarget, Statement};
///
/// let statements = vec![
///     Statement::new("data:*", "acme.*"),
///     Statement::new("data:*", "acme.*").with_constraint(Constraint::max_requests(1)),
/// ];
/// let target = RequestTarget::new("data", "find").on("acme", "users");
///
/// assert_eq!(derive_rate_limit(&statements, &target, &MatchSettings::default(), 60), 1);
/// ```
#[must_use]
pub fn derive_rate_limit(
    statements: &[Statement],
    target: &RequestTarget<'_>,
    settings: &MatchSettings,
    default: u64,
) -> u64 {
    PolicyEvaluator::new(statements, settings)
        .find(target)
        .and_then(|matched| first_request_budget(&matched))
        .unwrap_or(default)
}

/// Identity a rate-limit bucket is keyed on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RateLimitKey {
    /// Authenticated caller identifier
    User(String),
    /// Source IP for callers without an identifier
    SourceIp(String),
}

impl RateLimitKey {
    /// Key on the caller id when present, else on the source IP
    #[must_use]
    pub fn for_caller(caller_id: Option<&str>, source_ip: &str) -> Self {
        match caller_id {
            Some(id) => Self::User(id.into()),
            None => Self::SourceIp(source_ip.into()),
        }
    }

    /// Raw bucket identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::User(id) | Self::SourceIp(id) => id,
        }
    }
}

impl fmt::Display for RateLimitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
