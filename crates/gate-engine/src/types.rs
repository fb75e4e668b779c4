use serde::{Deserialize, Serialize};

/// Authorization decision result
///
/// Returned by [`crate::AuthorizationService::decide`] to indicate whether
/// an operation is allowed and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthDecision {
    /// Whether the operation is allowed
    pub allowed: bool,
    /// Human-readable reasons for the decision
    pub reasons: Vec<String>,
    /// Number of statements that allowed the operation
    pub matched: usize,
    /// Evaluation time in microseconds
    pub evaluation_time_us: u64,
}

/// Problem found while validating a policy document
///
/// `statement` is the zero-based index of the offending statement, if any.
/// `line` and `column` are only known for syntax errors reported by the
/// parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyDiagnostic {
    /// Human-readable problem description
    pub message: String,
    /// Offending statement, if the problem is statement-specific
    pub statement: Option<usize>,
    /// Line number where the error occurred (1-indexed)
    pub line: Option<u32>,
    /// Column number where the error occurred (1-indexed)
    pub column: Option<u32>,
}

impl PolicyDiagnostic {
    pub(crate) fn document(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            statement: None,
            line: None,
            column: None,
        }
    }

    pub(crate) fn statement(index: usize, message: impl Into<String>) -> Self {
        Self {
            statement: Some(index),
            ..Self::document(message)
        }
    }
}
