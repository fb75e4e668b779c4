//! Fuzz target for statement matching
//!
//! Matching runs on attacker-controlled service, method, database and
//! collection names. It must never panic, whatever the separators in play.

#![no_main]

use arbitrary::Arbitrary;
use core_policy::{MatchSettings, Statement};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    action: &'a str,
    resource: &'a str,
    service: &'a str,
    method: &'a str,
    db: Option<&'a str>,
    collection: Option<&'a str>,
}

fuzz_target!(|input: Input<'_>| {
    let settings = MatchSettings::default();
    let statement = Statement::new(input.action, input.resource);

    let _ = statement.matches_service_method(input.service, input.method, &settings);
    let matched =
        statement.matches_collection_database(input.db, input.collection, &settings);

    if input.resource == "*" {
        assert!(matched, "wildcard resource must match everything");
    }
});
