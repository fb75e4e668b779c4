//! Integration tests for user records, fingerprints and token payloads

use core_identity::hash::{self, HashProvider};
use core_identity::{AuthPayload, IdentityError, Srn, UserRecord};
use core_policy::{Policy, PolicyError, Statement};

fn alice() -> UserRecord {
    let mut user = UserRecord::new("u-1", "acme", "alice");
    user.active = true;
    user.srn = Srn::user("coeus", "acme", "alice").to_string();
    user.policy = Policy::new()
        .with_version("1.1.0")
        .add_statement(Statement::new("data:find", "acme.*"))
        .unwrap();
    user
}

#[test]
fn test_fingerprint_covers_canonical_signature() {
    let user = alice();
    let canonical = serde_json::to_string(&user.signature()).unwrap();
    assert_eq!(
        canonical,
        r#"{"active":true,"id":"u-1","org":"acme","policy":{"version":"1.1.0","statement":[{"action":"data:find","resource":"acme.*"}]},"srn":"srn:coeus:acme::user/alice","username":"alice"}"#
    );
    assert_eq!(
        user.fingerprint().unwrap(),
        hex::encode(blake3::hash(canonical.as_bytes()).as_bytes())
    );
}

#[test]
fn test_fingerprint_ignores_unsigned_fields() {
    let user = alice();
    let mut changed = user.clone();
    changed.email = Some("alice@acme.io".into());
    changed.verified = true;
    assert_eq!(user.fingerprint().unwrap(), changed.fingerprint().unwrap());
}

#[test]
fn test_fingerprint_tracks_signed_fields() {
    let user = alice();
    let base = user.fingerprint().unwrap();

    let mut inactive = user.clone();
    inactive.active = false;
    assert_ne!(inactive.fingerprint().unwrap(), base);

    let mut other_policy = user.clone();
    other_policy.policy = Policy::new();
    assert_ne!(other_policy.fingerprint().unwrap(), base);

    let mut other_org = user;
    other_org.org = "beta".into();
    assert_ne!(other_org.fingerprint().unwrap(), base);
}

#[test]
fn test_stored_hash_takes_precedence() {
    let mut user = alice();
    user.hash = Some("stored".into());
    assert_eq!(user.fingerprint().unwrap(), "stored");
}

#[test]
fn test_claims_carry_fingerprint() {
    let user = alice();
    let claims = user.claims().unwrap();
    assert_eq!(claims.caller_id(), Some("u-1"));
    assert_eq!(claims.fingerprint(), Some(user.fingerprint().unwrap().as_str()));
    assert_eq!(claims.policy, user.policy);
    assert!(claims.active);
}

#[test]
fn test_payload_from_json() {
    let payload = AuthPayload::from_json(
        r#"{
            "id": "u-1",
            "hash": "abc",
            "active": true,
            "org": "acme",
            "username": "alice",
            "srn": "srn:coeus:acme::user/alice",
            "policy": {"statement": [{"action": "data:*", "resource": "acme.*"}]},
            "iat": 1600000000
        }"#,
    )
    .unwrap();

    assert_eq!(payload.caller_id(), Some("u-1"));
    assert_eq!(payload.fingerprint(), Some("abc"));
    assert_eq!(payload.policy.statements().len(), 1);
}

#[test]
fn test_payload_defaults() {
    let payload = AuthPayload::from_json("{}").unwrap();
    assert_eq!(payload.caller_id(), None);
    assert_eq!(payload.fingerprint(), None);
    assert!(!payload.active);
    assert!(payload.policy.is_empty());
}

#[test]
fn test_payload_rejects_unknown_constraint() {
    let result = AuthPayload::from_json(
        r#"{"id":"u-1","policy":{"statement":[{"action":"data:*","resource":"*",
            "constraints":[{"type":"geo","value":"eu"}]}]}}"#,
    );
    match result {
        Err(IdentityError::Policy(PolicyError::UnknownConstraintType(kind))) => {
            assert_eq!(kind, "geo")
        }
        other => panic!("Expected UnknownConstraintType, got: {:?}", other),
    }
}

#[test]
fn test_payload_from_value_rejects_unknown_constraint() {
    let value = serde_json::json!({
        "id": "u-1",
        "policy": {"statement": [{"action": "data:*", "resource": "*",
            "constraints": [{"type": "geo", "value": "eu"}]}]}
    });
    assert!(matches!(
        AuthPayload::from_value(value),
        Err(IdentityError::Policy(PolicyError::UnknownConstraintType(_)))
    ));
}

#[test]
fn test_payload_malformed_claims() {
    assert!(matches!(
        AuthPayload::from_json(r#"{"active": "yes"}"#),
        Err(IdentityError::InvalidPayload(_))
    ));
}

#[test]
fn test_payload_from_value() {
    let value = serde_json::json!({"id": "u-2", "hash": ""});
    let payload = AuthPayload::from_value(value).unwrap();
    assert_eq!(payload.caller_id(), Some("u-2"));
    assert_eq!(payload.fingerprint(), None);
}

#[test]
fn test_hash_helpers() {
    assert_eq!(
        hash::hash_provider().hash(b"x"),
        *blake3::hash(b"x").as_bytes()
    );
    assert_eq!(hash::fingerprint("x").unwrap().len(), 64);
}

#[test]
fn test_token_rejections() {
    assert!(IdentityError::StaleToken.is_token_rejection());
    assert!(IdentityError::Inactive.is_token_rejection());
    assert!(!IdentityError::InvalidSrn("x".into()).is_token_rejection());
    assert_eq!(
        IdentityError::Inactive.to_string(),
        "Authorization token is invalid: User is inactive"
    );
}
