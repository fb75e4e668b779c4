// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Datagate Team

//! # gate-engine
//!
//! Request admission for datagate.
//!
//! This crate combines the policy core with token freshness tracking and
//! configuration into the checks a gateway runs on every request. It is
//! designed to be embedded by an HTTP layer, which maps [`GateError`] to
//! responses via [`GateError::status_code`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod gateway;
mod rate_limit;
mod service;
mod types;
mod utils;
mod validation;

// Re-export main types
pub use error::{GateError, Result};
pub use gateway::{Admission, Gateway};
pub use rate_limit::{RateLimitDecision, RateLimitSettings};
pub use service::AuthorizationService;
pub use types::{AuthDecision, PolicyDiagnostic};
pub use utils::{parse_action, parse_resource};
pub use validation::{validate_policy, validate_policy_toml};
