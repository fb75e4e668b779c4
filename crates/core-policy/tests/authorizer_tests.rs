//! Integration tests for PolicyAuthorizer

use core_policy::{
    Authorizer, Constraint, MatchSettings, Policy, PolicyAuthorizer, PolicyError, RequestContext,
    RequestTarget, Statement,
};

fn policy_of(statements: Vec<Statement>) -> Policy {
    statements.into_iter().collect()
}

fn local() -> RequestContext {
    RequestContext::new("127.0.0.1", "localhost:80")
}

#[test]
fn test_empty_policy_is_invalid() {
    let policy = Policy::new();
    let settings = MatchSettings::default();
    let authorizer = PolicyAuthorizer::new(&policy, &settings);

    let result = authorizer.authorize(&RequestTarget::new("data", "find").on("a", "b"), &local());
    assert!(matches!(result, Err(PolicyError::PolicyInvalid)));
}

#[test]
fn test_unmatched_request_is_denied() {
    let policy = policy_of(vec![Statement::new("data:find", "acme.*")]);
    let settings = MatchSettings::default();
    let authorizer = PolicyAuthorizer::new(&policy, &settings);

    let result =
        authorizer.authorize(&RequestTarget::new("data", "delete").on("acme", "users"), &local());
    assert!(matches!(result, Err(PolicyError::PermissionDenied)));
}

#[test]
fn test_find_and_update_on_database() {
    let policy = policy_of(vec![Statement::new(
        vec!["data:find", "data:update"],
        "acme.*",
    )]);
    let settings = MatchSettings::default();
    let authorizer = PolicyAuthorizer::new(&policy, &settings);

    let matched = authorizer
        .authorize(&RequestTarget::new("data", "find").on("acme", "users"), &local())
        .unwrap();
    assert_eq!(matched.len(), 1);

    let result =
        authorizer.authorize(&RequestTarget::new("data", "delete").on("acme", "users"), &local());
    assert!(matches!(result, Err(PolicyError::PermissionDenied)));
}

#[test]
fn test_deny_only_policy_is_denied_not_invalid() {
    let policy = policy_of(vec![Statement::new("data:*", "*").deny()]);
    let settings = MatchSettings::default();
    let authorizer = PolicyAuthorizer::new(&policy, &settings);

    let result = authorizer.authorize(&RequestTarget::new("data", "find").on("a", "b"), &local());
    assert!(matches!(result, Err(PolicyError::PermissionDenied)));
}

#[test]
fn test_deny_does_not_override_allow() {
    let policy = policy_of(vec![
        Statement::new("data:*", "acme.*").deny(),
        Statement::new("data:find", "acme.users"),
    ]);
    let settings = MatchSettings::default();
    let authorizer = PolicyAuthorizer::new(&policy, &settings);

    let matched = authorizer
        .authorize(&RequestTarget::new("data", "find").on("acme", "users"), &local())
        .unwrap();
    assert_eq!(matched, vec![&policy.statements()[1]]);
}

#[test]
fn test_ip_constraint_violation() {
    let policy = policy_of(vec![
        Statement::new("data:*", "*").with_constraint(Constraint::ip(vec!["127.0.0.2"]))
    ]);
    let settings = MatchSettings::default();
    let authorizer = PolicyAuthorizer::new(&policy, &settings);
    let target = RequestTarget::new("data", "find").on("acme", "users");

    let err = authorizer.authorize(&target, &local()).unwrap_err();
    assert!(matches!(err, PolicyError::ConstraintViolationIp { ref ip } if ip == "127.0.0.1"));
    assert_eq!(
        err.to_string(),
        "Invalid IP: Requests from 127.0.0.1 are not allowed by your Policy"
    );

    let ok = authorizer.authorize(&target, &RequestContext::new("127.0.0.2", "localhost:80"));
    assert!(ok.is_ok());
}

#[test]
fn test_hostname_constraint_violation_reports_raw_hostname() {
    let policy = policy_of(vec![
        Statement::new("data:*", "*").with_constraint(Constraint::hostname("example.com"))
    ]);
    let settings = MatchSettings::default();
    let authorizer = PolicyAuthorizer::new(&policy, &settings);
    let target = RequestTarget::new("data", "find").on("acme", "users");

    let err = authorizer.authorize(&target, &local()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid hostname: Requests from localhost:80 are not allowed by your Policy"
    );

    let ok = authorizer.authorize(&target, &RequestContext::new("1.2.3.4", "example.com:8080"));
    assert!(ok.is_ok());
}

#[test]
fn test_ip_is_checked_before_hostname() {
    let policy = policy_of(vec![Statement::new("data:*", "*")
        .with_constraint(Constraint::ip("10.0.0.1"))
        .with_constraint(Constraint::hostname("example.com"))]);
    let settings = MatchSettings::default();
    let authorizer = PolicyAuthorizer::new(&policy, &settings);

    let err = authorizer
        .authorize(&RequestTarget::new("data", "find").on("a", "b"), &local())
        .unwrap_err();
    assert!(matches!(err, PolicyError::ConstraintViolationIp { .. }));
}

#[test]
fn test_ip_constraint_on_any_matched_statement_suffices() {
    let policy = policy_of(vec![
        Statement::new("data:*", "*").with_constraint(Constraint::ip("10.0.0.1")),
        Statement::new("data:find", "acme.*").with_constraint(Constraint::ip("127.0.0.1")),
    ]);
    let settings = MatchSettings::default();
    let authorizer = PolicyAuthorizer::new(&policy, &settings);

    let matched = authorizer
        .authorize(&RequestTarget::new("data", "find").on("acme", "users"), &local())
        .unwrap();
    assert_eq!(matched.len(), 2);
}

#[test]
fn test_unconstrained_matched_statement_does_not_lift_restriction() {
    // One matched statement restricts IPs; the other carries no IP constraint.
    // The restriction still applies.
    let policy = policy_of(vec![
        Statement::new("data:*", "*"),
        Statement::new("data:find", "acme.*").with_constraint(Constraint::ip("10.0.0.1")),
    ]);
    let settings = MatchSettings::default();
    let authorizer = PolicyAuthorizer::new(&policy, &settings);

    let result =
        authorizer.authorize(&RequestTarget::new("data", "find").on("acme", "users"), &local());
    assert!(matches!(result, Err(PolicyError::ConstraintViolationIp { .. })));
}

#[test]
fn test_constraints_of_unmatched_statements_are_ignored() {
    let policy = policy_of(vec![
        Statement::new("data:find", "acme.*"),
        Statement::new("data:delete", "acme.*").with_constraint(Constraint::ip("10.0.0.1")),
    ]);
    let settings = MatchSettings::default();
    let authorizer = PolicyAuthorizer::new(&policy, &settings);

    let result =
        authorizer.authorize(&RequestTarget::new("data", "find").on("acme", "users"), &local());
    assert!(result.is_ok());
}

#[test]
fn test_unscoped_operation() {
    let policy = policy_of(vec![Statement::new("user:activate", "acme.users")]);
    let settings = MatchSettings::default();
    let authorizer = PolicyAuthorizer::new(&policy, &settings);

    assert!(authorizer
        .authorize(&RequestTarget::new("user", "activate"), &local())
        .is_ok());
}

#[test]
fn test_trait_object_dispatch() {
    let policy = policy_of(vec![Statement::new("data:*", "acme.*")]);
    let settings = MatchSettings::default();
    let concrete = PolicyAuthorizer::new(&policy, &settings);
    let authorizer: &dyn Authorizer = &concrete;

    assert_eq!(concrete.statement_count(), 1);
    assert!(authorizer
        .authorize(&RequestTarget::new("data", "find").on("acme", "x"), &local())
        .is_ok());
}

#[test]
fn test_authorization_is_deterministic() {
    let policy = policy_of(vec![
        Statement::new("data:*", "acme.*").with_constraint(Constraint::hostname("localhost"))
    ]);
    let settings = MatchSettings::default();
    let authorizer = PolicyAuthorizer::new(&policy, &settings);
    let target = RequestTarget::new("data", "update").on("acme", "orders");

    let first = authorizer.authorize(&target, &local()).map(|m| m.len()).ok();
    for _ in 0..10 {
        assert_eq!(
            authorizer.authorize(&target, &local()).map(|m| m.len()).ok(),
            first
        );
    }
}

#[test]
fn test_denials_are_classified() {
    assert!(PolicyError::PolicyInvalid.is_denial());
    assert!(PolicyError::PermissionDenied.is_denial());
    assert!(PolicyError::ConstraintViolationIp { ip: "1".into() }.is_denial());
    assert!(!PolicyError::UnknownConstraintType("geo".into()).is_denial());
}
