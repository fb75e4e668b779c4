//! Integration tests for policy document parsing

use app_utils::parser::parser_for;
use app_utils::{load_policy, Error, JsonParser, PolicyParser, TomlParser, YamlParser};
use core_policy::{Constraint, PolicyError};
use std::io::Write;
use std::path::Path;

const YAML_POLICY: &str = r#"
version: "1.1.0"
statement:
  - action: ["data:find", "data:update"]
    resource: "acme.*"
    constraints:
      - type: ip
        value: ["10.0.0.1"]
  - action: "data:delete"
    resource: "acme.*"
    allow: false
"#;

#[test]
fn test_yaml_parser() {
    let policy = YamlParser.parse(YAML_POLICY).unwrap();
    assert_eq!(policy.version(), Some("1.1.0"));
    assert_eq!(policy.statements().len(), 2);
    assert_eq!(
        policy.statements()[0].constraints,
        vec![Constraint::ip(vec!["10.0.0.1"])]
    );
    assert!(!policy.statements()[1].is_allowed());
}

#[test]
fn test_yaml_parser_rejects_unknown_constraint() {
    let yaml = "statement:\n  - action: data:*\n    resource: '*'\n    constraints:\n      - type: geo\n        value: eu\n";
    assert!(matches!(
        YamlParser.parse(yaml),
        Err(PolicyError::UnknownConstraintType(kind)) if kind == "geo"
    ));
}

#[test]
fn test_yaml_parser_rejects_malformed_document() {
    assert!(matches!(
        YamlParser.parse("statement: [unclosed"),
        Err(PolicyError::SerializationError(_))
    ));
}

#[test]
fn test_every_format_reports_unknown_constraint_type() {
    let json = r#"{"statement":[{"action":"data:*","resource":"*",
        "constraints":[{"type":"geo","value":"eu"}]}]}"#;
    let toml = r#"
[[statement]]
action = "data:*"
resource = "*"

[[statement.constraints]]
type = "geo"
value = "eu"
"#;

    for (name, result) in [("json", JsonParser.parse(json)), ("toml", TomlParser.parse(toml))] {
        assert!(
            matches!(result, Err(PolicyError::UnknownConstraintType(ref kind)) if kind == "geo"),
            "{} parser returned {:?}",
            name,
            result
        );
    }
}

#[test]
fn test_load_policy_surfaces_unknown_constraint_type() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(
        br#"{"statement":[{"action":"data:*","resource":"*","constraints":[{"type":"geo","value":"eu"}]}]}"#,
    )
    .unwrap();

    assert!(matches!(
        load_policy(file.path()),
        Err(Error::Policy(PolicyError::UnknownConstraintType(_)))
    ));
}

#[test]
fn test_formats_agree() {
    let yaml = YamlParser.parse(YAML_POLICY).unwrap();
    let json = JsonParser.parse(&yaml.to_json().unwrap()).unwrap();
    let toml = TomlParser.parse(&yaml.to_toml().unwrap()).unwrap();
    assert_eq!(yaml, json);
    assert_eq!(yaml, toml);
}

#[test]
fn test_parser_for_extension() {
    assert!(parser_for(Path::new("p.json")).is_ok());
    assert!(parser_for(Path::new("p.TOML")).is_ok());
    assert!(parser_for(Path::new("p.yaml")).is_ok());
    assert!(matches!(
        parser_for(Path::new("p.txt")),
        Err(Error::UnsupportedFormat(_))
    ));
}

#[test]
fn test_load_policy_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(YAML_POLICY.as_bytes()).unwrap();

    let policy = load_policy(file.path()).unwrap();
    assert_eq!(policy.statements().len(), 2);
}

#[test]
fn test_load_policy_reports_policy_errors() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(br#"{"statement":[{"action":"data:*"}]}"#).unwrap();

    assert!(matches!(load_policy(file.path()), Err(Error::Policy(_))));
}
