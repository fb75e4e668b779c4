//! Policy document validation
//!
//! Parsing already enforces structure and size limits. The checks here are
//! the deployment rules on top: which actions may be granted, which
//! databases are off limits, and whether constraint values are well formed.

use crate::types::PolicyDiagnostic;
use app_utils::config::PolicyConfig;
use core_policy::{Constraint, OneOrMany, Policy, PolicyError};
use std::collections::HashSet;
use std::net::Ipv4Addr;

/// Validate `policy` against deployment rules
///
/// Returns every problem found; an empty list means the policy is valid.
pub fn validate_policy(policy: &Policy, config: &PolicyConfig) -> Vec<PolicyDiagnostic> {
    let mut diagnostics = Vec::new();

    if policy.is_empty() {
        diagnostics.push(PolicyDiagnostic::document(
            PolicyError::PolicyInvalid.to_string(),
        ));
        return diagnostics;
    }

    let mut seen = HashSet::new();
    for (index, statement) in policy.statements().iter().enumerate() {
        if !seen.insert(statement) {
            diagnostics.push(PolicyDiagnostic::statement(index, "duplicate statement"));
        }

        if statement.action.is_empty() {
            diagnostics.push(PolicyDiagnostic::statement(index, "no action given"));
        }
        for action in statement.action.iter() {
            if !config.action_values.iter().any(|allowed| allowed == action) {
                diagnostics.push(PolicyDiagnostic::statement(
                    index,
                    format!("action '{}' is not one of the allowed actions", action),
                ));
            }
        }

        if statement.resource.is_empty() {
            diagnostics.push(PolicyDiagnostic::statement(index, "no resource given"));
        }
        for resource in statement.resource.iter() {
            if resource.is_empty() {
                diagnostics.push(PolicyDiagnostic::statement(index, "empty resource"));
            } else if let Some(db) = config
                .reserved_databases
                .iter()
                .find(|db| resource.starts_with(db.as_str()))
            {
                diagnostics.push(PolicyDiagnostic::statement(
                    index,
                    format!("resource '{}' is in reserved database '{}'", resource, db),
                ));
            }
        }

        let mut seen_constraints = HashSet::new();
        for constraint in &statement.constraints {
            if !seen_constraints.insert(constraint) {
                diagnostics.push(PolicyDiagnostic::statement(index, "duplicate constraint"));
            }
            if let Some(message) = check_constraint(constraint) {
                diagnostics.push(PolicyDiagnostic::statement(index, message));
            }
        }
    }

    diagnostics
}

/// Parse a TOML policy document and validate it
///
/// Syntax errors are reported as a single diagnostic carrying the position
/// the parser reported.
pub fn validate_policy_toml(input: &str, config: &PolicyConfig) -> Vec<PolicyDiagnostic> {
    match Policy::from_toml(input) {
        Ok(policy) => validate_policy(&policy, config),
        Err(err) => {
            let message = err.to_string();
            let (line, column) = parse_toml_error_position(&message);
            vec![PolicyDiagnostic {
                message,
                statement: None,
                line,
                column,
            }]
        }
    }
}

fn check_constraint(constraint: &Constraint) -> Option<String> {
    match constraint {
        Constraint::MaxRequests(OneOrMany::One(_)) => None,
        Constraint::MaxRequests(OneOrMany::Many(_)) => {
            Some("maxRequests value must be a single number".to_string())
        }
        Constraint::Ip(values) => values
            .iter()
            .find(|ip| ip.parse::<Ipv4Addr>().is_err())
            .map(|ip| format!("'{}' is not an IPv4 address", ip)),
        Constraint::Hostname(values) => values
            .iter()
            .find(|host| !is_hostname(host))
            .map(|host| format!("'{}' is not a valid hostname", host)),
    }
}

/// RFC 1123 hostname syntax
fn is_hostname(host: &str) -> bool {
    let host = host.strip_suffix('.').unwrap_or(host);
    if host.is_empty() || host.len() > 253 {
        return false;
    }

    host.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

// Helper to extract line info from toml error string
fn parse_toml_error_position(msg: &str) -> (Option<u32>, Option<u32>) {
    // Example: "TOML parse error at line 1, column 10"
    if let Some(line_idx) = msg.find("line ") {
        if let Some(col_idx) = msg.find("column ") {
            let line_str = &msg[line_idx + 5..];
            let line_end = line_str.find(',').unwrap_or(line_str.len());
            let line = line_str[..line_end].trim().parse::<u32>().ok();

            let col_str = &msg[col_idx + 7..];
            let col_end = col_str
                .find(|c: char| !c.is_numeric())
                .unwrap_or(col_str.len());
            let col = col_str[..col_end].trim().parse::<u32>().ok();

            return (line, col);
        }
    }
    (None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostnames() {
        assert!(is_hostname("localhost"));
        assert!(is_hostname("api.acme.io"));
        assert!(is_hostname("api.acme.io."));
        assert!(is_hostname("x-1.example.com"));
        assert!(!is_hostname(""));
        assert!(!is_hostname("-bad.com"));
        assert!(!is_hostname("bad..com"));
        assert!(!is_hostname("under_score.com"));
        assert!(!is_hostname(&"a".repeat(64)));
    }

    #[test]
    fn test_toml_error_position() {
        assert_eq!(
            parse_toml_error_position("TOML parse error at line 3, column 10"),
            (Some(3), Some(10))
        );
        assert_eq!(parse_toml_error_position("no position"), (None, None));
    }
}
