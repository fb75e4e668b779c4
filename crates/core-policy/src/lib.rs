// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Datagate Team

//! # core-policy
//!
//! Pure policy engine for the datagate authorization core, with no
//! dependencies on network, storage or token layers.
//!
//! This crate provides:
//! - Policy statements and their wildcard-aware matching
//! - Typed runtime constraints (source IP, hostname, request budget)
//! - Evaluation of a caller's policy against a requested operation
//! - Derivation of per-caller request budgets
//!
//! ## Security
//!
//! - Strict limits on policy size to bound evaluation cost
//!   - MAX_STATEMENTS_PER_POLICY = 1024
//!   - MAX_PATTERN_LENGTH = 256
//! - Unknown constraint types are rejected at deserialization time

#![no_std]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

pub mod authorizer;
pub mod builder;
pub mod constraint;
pub mod error;
pub mod evaluator;
pub mod policy;
pub mod rate_limit;
pub mod settings;
pub mod statement;

pub use authorizer::{Authorizer, PolicyAuthorizer, RequestContext};
pub use builder::{PolicyBuilder, StatementBuilder};
pub use constraint::{Candidate, Constraint, ConstraintKind, ConstraintValue, OneOrMany};
/// Re-export commonly used types
pub use error::{PolicyError, Result};
pub use evaluator::{PolicyEvaluator, RequestTarget};
pub use policy::{Policy, PolicyDocument};
pub use rate_limit::{
    derive_rate_limit, first_request_budget, RateLimitKey, DEFAULT_MAX_REQUESTS,
    DEFAULT_TIME_WINDOW_MS,
};
pub use settings::MatchSettings;
pub use statement::Statement;

/// Maximum number of statements per policy
pub const MAX_STATEMENTS_PER_POLICY: usize = 1024;

/// Maximum length for a single action or resource pattern
pub const MAX_PATTERN_LENGTH: usize = 256;
