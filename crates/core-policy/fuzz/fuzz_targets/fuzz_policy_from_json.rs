//! Fuzz target for Policy::from_json
//!
//! Policies arrive inside token claims, so deserialization must handle
//! arbitrary JSON without panicking and must enforce the size limits.

#![no_main]

use core_policy::{Policy, MAX_PATTERN_LENGTH, MAX_STATEMENTS_PER_POLICY};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(policy) = Policy::from_json(data) {
        assert!(policy.statements().len() <= MAX_STATEMENTS_PER_POLICY);
        for statement in policy.statements() {
            for pattern in statement.action.iter().chain(statement.resource.iter()) {
                assert!(pattern.len() <= MAX_PATTERN_LENGTH);
            }
        }
        assert!(policy.validate().is_ok(), "Parsed policy failed validation");

        // A parsed policy must survive a round trip
        let json = policy.to_json().expect("serialize");
        assert_eq!(Policy::from_json(&json).expect("reparse"), policy);
    }
});
