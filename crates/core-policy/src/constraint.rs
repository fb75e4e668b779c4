//! Runtime constraints attached to policy statements
//!
//! A constraint narrows an allowed statement to requests that satisfy an
//! extra condition: a source IP, a hostname, or a request budget.
//!
//! On the wire a constraint is `{ "type": <tag>, "value": <scalar | list> }`.
//! Deserialization goes through [`Constraint::from_parts`], so an unknown
//! `type` fails loudly instead of producing a constraint nobody can evaluate.
//! Serde can only report that failure as a message; parse whole policies
//! through [`crate::PolicyDocument`] to get `UnknownConstraintType` back.
//!
//! ## Equality
//!
//! | Variant       | Candidate         | Rule                                   |
//! |---------------|-------------------|----------------------------------------|
//! | `maxRequests` | number            | scalar equality only                   |
//! | `ip`          | string            | literal equality or list containment   |
//! | `hostname`    | string            | same, after stripping a `:port` suffix |

use crate::error::{PolicyError, Result};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// A single value or a list of values
///
/// Policies written by hand use both forms (`"acme.*"` and `["acme.*"]`), so
/// every list-capable field accepts either.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// Scalar form
    One(T),
    /// List form
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// View the value(s) as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::One(value) => core::slice::from_ref(value),
            Self::Many(values) => values.as_slice(),
        }
    }

    /// Iterate over the value(s)
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Whether this is an empty list
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl From<u64> for OneOrMany<u64> {
    fn from(value: u64) -> Self {
        Self::One(value)
    }
}

impl From<Vec<u64>> for OneOrMany<u64> {
    fn from(values: Vec<u64>) -> Self {
        Self::Many(values)
    }
}

impl From<String> for OneOrMany<String> {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Vec<String>> for OneOrMany<String> {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

impl From<&str> for OneOrMany<String> {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<Vec<&str>> for OneOrMany<String> {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(values.into_iter().map(ToString::to_string).collect())
    }
}

/// Constraint discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// Request hostname restriction
    Hostname,
    /// Request source IP restriction
    Ip,
    /// Request budget per time window
    MaxRequests,
}

impl ConstraintKind {
    /// Wire name of this kind
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hostname => "hostname",
            Self::Ip => "ip",
            Self::MaxRequests => "maxRequests",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConstraintKind {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hostname" => Ok(Self::Hostname),
            "ip" => Ok(Self::Ip),
            "maxRequests" => Ok(Self::MaxRequests),
            other => Err(PolicyError::UnknownConstraintType(other.to_string())),
        }
    }
}

/// Loosely typed constraint value as it appears on the wire
///
/// Narrowed to the variant's value type by [`Constraint::from_parts`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstraintValue {
    /// A single number
    Number(u64),
    /// A list of numbers (an empty list deserializes here too)
    Numbers(Vec<u64>),
    /// A single string
    Text(String),
    /// A list of strings
    Texts(Vec<String>),
}

impl ConstraintValue {
    fn into_texts(self, kind: ConstraintKind) -> Result<OneOrMany<String>> {
        match self {
            Self::Text(value) => Ok(OneOrMany::One(value)),
            Self::Texts(values) => Ok(OneOrMany::Many(values)),
            Self::Numbers(values) if values.is_empty() => Ok(OneOrMany::Many(Vec::new())),
            Self::Number(_) | Self::Numbers(_) => Err(PolicyError::InvalidConstraintValue {
                kind: kind.as_str(),
                reason: "expected a string or a list of strings".to_string(),
            }),
        }
    }

    fn into_numbers(self, kind: ConstraintKind) -> Result<OneOrMany<u64>> {
        match self {
            Self::Number(value) => Ok(OneOrMany::One(value)),
            Self::Numbers(values) => Ok(OneOrMany::Many(values)),
            Self::Text(_) | Self::Texts(_) => Err(PolicyError::InvalidConstraintValue {
                kind: kind.as_str(),
                reason: "expected a number or a list of numbers".to_string(),
            }),
        }
    }
}

/// Value a constraint is tested against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate<'a> {
    /// String candidate (IP address, hostname)
    Text(&'a str),
    /// Numeric candidate (request budget)
    Number(u64),
}

impl<'a> From<&'a str> for Candidate<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl From<u64> for Candidate<'_> {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

/// A runtime condition attached to a statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawConstraint", into = "RawConstraint")]
pub enum Constraint {
    /// Allowed request hostname(s), compared without port
    Hostname(OneOrMany<String>),
    /// Allowed source IP(s), compared literally
    Ip(OneOrMany<String>),
    /// Request budget per rate-limit window
    MaxRequests(OneOrMany<u64>),
}

impl Constraint {
    /// Build a constraint from its wire discriminator and value
    ///
    /// # Errors
    ///
    /// - `UnknownConstraintType` if `kind` names no variant
    /// - `InvalidConstraintValue` if the value has the wrong type for the variant
    pub fn from_parts(kind: &str, value: ConstraintValue) -> Result<Self> {
        let kind = kind.parse::<ConstraintKind>()?;
        match kind {
            ConstraintKind::Hostname => Ok(Self::Hostname(value.into_texts(kind)?)),
            ConstraintKind::Ip => Ok(Self::Ip(value.into_texts(kind)?)),
            ConstraintKind::MaxRequests => Ok(Self::MaxRequests(value.into_numbers(kind)?)),
        }
    }

    /// Shorthand for a hostname constraint
    #[must_use]
    pub fn hostname(value: impl Into<OneOrMany<String>>) -> Self {
        Self::Hostname(value.into())
    }

    /// Shorthand for an IP constraint
    #[must_use]
    pub fn ip(value: impl Into<OneOrMany<String>>) -> Self {
        Self::Ip(value.into())
    }

    /// Shorthand for a request budget constraint
    #[must_use]
    pub fn max_requests(value: impl Into<OneOrMany<u64>>) -> Self {
        Self::MaxRequests(value.into())
    }

    /// Discriminator of this constraint
    #[must_use]
    pub const fn kind(&self) -> ConstraintKind {
        match self {
            Self::Hostname(_) => ConstraintKind::Hostname,
            Self::Ip(_) => ConstraintKind::Ip,
            Self::MaxRequests(_) => ConstraintKind::MaxRequests,
        }
    }

    /// Whether `candidate` equals, or is contained in, this constraint's value
    #[must_use]
    pub fn equals(&self, candidate: Candidate<'_>) -> bool {
        match (self, candidate) {
            (Self::MaxRequests(OneOrMany::One(limit)), Candidate::Number(n)) => *limit == n,
            (Self::MaxRequests(_), _) => false,
            (Self::Ip(allowed), Candidate::Text(ip)) => contains_text(allowed, ip),
            (Self::Hostname(allowed), Candidate::Text(host)) => {
                contains_text(allowed, strip_port(host))
            }
            (Self::Ip(_) | Self::Hostname(_), Candidate::Number(_)) => false,
        }
    }

    /// Filter `constraints` to those of `kind`, optionally also equal to `value`
    ///
    /// Returns `None` rather than an empty list when nothing is left, so callers
    /// can tell "no constraint of this kind" apart with a single pattern match.
    #[must_use]
    pub fn find<'a>(
        kind: ConstraintKind,
        constraints: &'a [Constraint],
        value: Option<Candidate<'_>>,
    ) -> Option<Vec<&'a Constraint>> {
        let found: Vec<&Constraint> = constraints
            .iter()
            .filter(|constraint| constraint.kind() == kind)
            .filter(|constraint| value.map_or(true, |candidate| constraint.equals(candidate)))
            .collect();

        if found.is_empty() {
            None
        } else {
            Some(found)
        }
    }

    /// Most restrictive request budget carried by a `maxRequests` constraint
    ///
    /// `None` for other variants and for an empty list.
    #[must_use]
    pub fn request_budget(&self) -> Option<u64> {
        match self {
            Self::MaxRequests(limit) => limit.iter().copied().min(),
            Self::Hostname(_) | Self::Ip(_) => None,
        }
    }
}

fn contains_text(allowed: &OneOrMany<String>, candidate: &str) -> bool {
    match allowed {
        OneOrMany::One(value) => value == candidate,
        OneOrMany::Many(values) => values.iter().any(|value| value == candidate),
    }
}

/// Remove a `:port` suffix; a leading `:` is kept as part of the host
fn strip_port(host: &str) -> &str {
    match host.find(':') {
        Some(idx) if idx > 0 => &host[..idx],
        _ => host,
    }
}

/// Wire representation used by serde
///
/// Deserializing this never looks at `type`, so policy documents can defer
/// the check to [`Constraint::from_parts`] and keep its typed error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RawConstraint {
    #[serde(rename = "type")]
    pub(crate) kind: String,
    pub(crate) value: ConstraintValue,
}

impl TryFrom<RawConstraint> for Constraint {
    type Error = PolicyError;

    fn try_from(raw: RawConstraint) -> Result<Self> {
        Self::from_parts(&raw.kind, raw.value)
    }
}

impl From<Constraint> for RawConstraint {
    fn from(constraint: Constraint) -> Self {
        let kind = constraint.kind().as_str().to_string();
        let value = match constraint {
            Constraint::Hostname(values) | Constraint::Ip(values) => match values {
                OneOrMany::One(value) => ConstraintValue::Text(value),
                OneOrMany::Many(values) => ConstraintValue::Texts(values),
            },
            Constraint::MaxRequests(values) => match values {
                OneOrMany::One(value) => ConstraintValue::Number(value),
                OneOrMany::Many(values) => ConstraintValue::Numbers(values),
            },
        };
        Self { kind, value }
    }
}
