//! Integration tests for Policy domain types

use core_policy::{
    Constraint, MatchSettings, Policy, PolicyError, RequestTarget, Statement, MAX_PATTERN_LENGTH,
    MAX_STATEMENTS_PER_POLICY,
};

#[test]
fn test_policy_creation() {
    let policy = Policy::new();
    assert!(policy.is_empty());
    assert_eq!(policy.version(), None);

    let policy = Policy::new().with_version("1.0.0");
    assert_eq!(policy.version(), Some("1.0.0"));
}

#[test]
fn test_add_statement_keeps_order() {
    let policy = Policy::new()
        .add_statement(Statement::new("data:find", "a.*"))
        .unwrap()
        .add_statement(Statement::new("data:update", "b.*"))
        .unwrap();

    let actions: Vec<_> = policy
        .statements()
        .iter()
        .map(|s| s.action.as_slice()[0].clone())
        .collect();
    assert_eq!(actions, vec!["data:find", "data:update"]);
}

#[test]
fn test_too_many_statements() {
    let mut policy = Policy::new();
    for i in 0..MAX_STATEMENTS_PER_POLICY {
        policy = policy
            .add_statement(Statement::new("data:find", format!("db{}.*", i)))
            .unwrap();
    }

    let result = policy.add_statement(Statement::new("data:find", "overflow.*"));
    assert!(matches!(
        result,
        Err(PolicyError::TooManyStatements { max, attempted })
            if max == MAX_STATEMENTS_PER_POLICY && attempted == MAX_STATEMENTS_PER_POLICY + 1
    ));
}

#[test]
fn test_pattern_too_long() {
    let long = "a".repeat(MAX_PATTERN_LENGTH + 1);
    let result = Policy::new().add_statement(Statement::new("data:find", long));
    assert!(matches!(
        result,
        Err(PolicyError::PatternTooLong { max: MAX_PATTERN_LENGTH, .. })
    ));

    let exact = "a".repeat(MAX_PATTERN_LENGTH);
    assert!(Policy::new()
        .add_statement(Statement::new("data:find", exact))
        .is_ok());
}

#[test]
fn test_json_roundtrip_preserves_wire_shape() {
    let policy = Policy::new()
        .with_version("1.1.0")
        .add_statement(
            Statement::new(vec!["data:find", "data:update"], "acme.*")
                .with_constraint(Constraint::ip("127.0.0.1")),
        )
        .unwrap()
        .add_statement(Statement::new("data:delete", "acme.*").deny())
        .unwrap();

    let json = policy.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "version": "1.1.0",
            "statement": [
                {
                    "action": ["data:find", "data:update"],
                    "resource": "acme.*",
                    "constraints": [{"type": "ip", "value": "127.0.0.1"}]
                },
                {"action": "data:delete", "resource": "acme.*", "allow": false}
            ]
        })
    );

    assert_eq!(Policy::from_json(&json).unwrap(), policy);
}

#[test]
fn test_toml_roundtrip() {
    let policy = Policy::new()
        .add_statement(
            Statement::new("data:*", "acme.*").with_constraint(Constraint::max_requests(10)),
        )
        .unwrap();

    let toml = policy.to_toml().unwrap();
    assert_eq!(Policy::from_toml(&toml).unwrap(), policy);
}

#[test]
fn test_collect_from_statements() {
    let policy: Policy = (0..3)
        .map(|i| Statement::new("data:find", format!("db{}.*", i)))
        .collect();
    assert_eq!(policy.statements().len(), 3);
    assert!(policy.validate().is_ok());
}

#[test]
fn test_matching_outlives_settings() {
    let policy = Policy::new()
        .add_statement(Statement::new("data:*", "acme.*"))
        .unwrap();
    let target = RequestTarget::new("data", "find").on("acme", "users");

    let matched = {
        let settings = MatchSettings::default();
        policy.matching(&target, &settings)
    };
    assert_eq!(matched, Some(vec![&policy.statements()[0]]));
}
