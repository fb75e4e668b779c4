//! Simple Authorization Flow Example
//!
//! This example walks through the gateway's admission workflow:
//!
//! 1. Load users and build the token freshness cache
//! 2. Issue a token for a user and admit requests with it
//! 3. Change the user, rebuild, and watch the old token go stale
//!
//! Run with: cargo run --example simple_auth_flow

use datagate::engine::{Gateway, RateLimitSettings};
use datagate::identity::{InMemoryUserSource, RebuildTrigger, TokenFreshnessCache, UserRecord};
use datagate::policy::{
    Constraint, MatchSettings, Policy, RequestContext, RequestTarget, StatementBuilder,
};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("datagate - Simple Authorization Flow");
    println!("------------------------------------");
    println!();

    // -------------------------------------------------------------------------
    // Step 1: Users and their policies
    // -------------------------------------------------------------------------
    // Alice may read anything in the acme database and write to orders from
    // the office network, at most 10 writes per window.

    let mut alice = UserRecord::new("u-alice", "acme", "alice");
    alice.active = true;
    alice.verified = true;
    alice.policy = Policy::new()
        .with_version("1.1.0")
        .add_statement(
            StatementBuilder::new()
                .action("data:find")
                .resource("acme.*")
                .build()?,
        )?
        .add_statement(
            StatementBuilder::new()
                .action("data:insert")
                .action("data:update")
                .resource("acme.orders")
                .constraint(Constraint::ip("10.0.0.1"))
                .constraint(Constraint::max_requests(10))
                .build()?,
        )?;

    let mut source = InMemoryUserSource::new(vec![alice.clone()]);

    let cache = Arc::new(TokenFreshnessCache::new());
    let gateway = Gateway::new(
        Arc::clone(&cache),
        MatchSettings::default(),
        RateLimitSettings::default(),
    );
    let generation = gateway.rebuild(&source, RebuildTrigger::Startup)?;
    println!("Cache built: {} user(s), generation {}", cache.len(), generation);
    println!();

    // -------------------------------------------------------------------------
    // Step 2: Admit requests
    // -------------------------------------------------------------------------

    let token = alice.claims()?;
    let office = RequestContext::new("10.0.0.1", "api.acme.io");
    let home = RequestContext::new("192.168.1.20", "api.acme.io");

    let read = RequestTarget::new("data", "find").on("acme", "users");
    let write = RequestTarget::new("data", "insert").on("acme", "orders");

    let checks = [
        ("read users from home", &read, &home),
        ("write orders from office", &write, &office),
        ("write orders from home", &write, &home),
    ];
    for (label, target, context) in checks {
        match gateway.admit(&token, context, target) {
            Ok(admission) => println!(
                "  ✓ {}: allowed, {} request(s) per window",
                label, admission.rate_limit.max_requests
            ),
            Err(err) => println!("  ✗ {}: {} ({})", label, err, err.status_code()),
        }
    }
    println!();

    // -------------------------------------------------------------------------
    // Step 3: Revoke by changing the user
    // -------------------------------------------------------------------------
    // Deactivating alice changes her fingerprint, so the token issued above
    // no longer matches once the cache is rebuilt.

    alice.active = false;
    source.upsert(alice);
    gateway.rebuild(&source, RebuildTrigger::UserUpdated)?;

    match gateway.admit(&token, &home, &read) {
        Ok(_) => println!("  ✓ old token still accepted"),
        Err(err) => println!("  ✗ old token rejected: {} ({})", err, err.status_code()),
    }

    Ok(())
}
