// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Datagate Team

//! # datagate
//!
//! Authorization core for a multi-tenant data-access gateway.
//!
//! This crate provides a unified API over the gateway's building blocks:
//!
//! - **Policy Engine**: statement matching, constraints and rate-limit derivation
//! - **Identity**: user records, token fingerprints and the freshness cache
//! - **Gateway**: per-request admission combining both
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use datagate::engine::{Gateway, RateLimitSettings};
//! use datagate::identity::{RebuildTrigger, TokenFreshnessCache, UserRecord};
//! use datagate::policy::{MatchSettings, Policy, RequestContext, RequestTarget, Statement};
//!
//! let mut alice = UserRecord::new("u1", "acme", "alice");
//! alice.active = true;
//! alice.policy = Policy::new().add_statement(Statement::new("data:*", "acme.*")).unwrap();
//!
//! let cache = Arc::new(TokenFreshnessCache::new());
//! cache.rebuild([&alice]).unwrap();
//!
//! let gateway = Gateway::new(cache, MatchSettings::default(), RateLimitSettings::default());
//! let claims = alice.claims().unwrap();
//! let context = RequestContext::new("127.0.0.1", "localhost");
//! let target = RequestTarget::new("data", "find").on("acme", "users");
//!
//! let admission = gateway.admit(&claims, &context, &target).unwrap();
//! assert_eq!(admission.rate_limit.key.as_str(), "u1");
//! ```
//!
//! ## Architecture
//!
//! This facade crate re-exports the following modules:
//!
//! - [`policy`] - Policy statements and evaluation (from `core-policy`)
//! - [`identity`] - Users and token freshness (from `core-identity`)
//! - [`engine`] - Request admission (from `gate-engine`)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Identity module.
///
/// Re-exports `core_identity` for user records and the token freshness cache.
pub mod identity {
    pub use core_identity::*;
}

/// Policy engine module.
///
/// Re-exports `core_policy` for statement matching and evaluation.
pub mod policy {
    pub use core_policy::*;
}

/// Gateway module.
///
/// Re-exports `gate_engine` for request admission.
pub mod engine {
    pub use gate_engine::*;
}

// Convenience re-exports at root level
pub use core_identity::{AuthPayload, TokenFreshnessCache, UserRecord};
pub use core_policy::{Policy, Statement};
pub use gate_engine::{GateError, Gateway};
