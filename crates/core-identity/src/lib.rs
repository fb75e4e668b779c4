// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Datagate Team

//! # identity
//!
//! Users, their token claims and token freshness for datagate.
//!
//! Tokens are verified upstream; this crate decides whether a verified token
//! still reflects its user. Each token carries a fingerprint of the user's
//! signature claims, and [`TokenFreshnessCache`] holds the current
//! fingerprint of every user.
//!
//! ## Features
//!
//! - **Typed payloads**: token claims decode into [`AuthPayload`], with the
//!   embedded policy validated on the way in
//! - **Blake3 fingerprints**: over the canonical JSON of the signature claims
//! - **Lock-free reads**: the cache publishes immutable snapshots via `arc-swap`
//!
//! ## Example
//!
//! ```
//! use core_identity::{
//!     AuthPayload, InMemoryUserSource, RebuildTrigger, TokenFreshnessCache, UserRecord,
//! };
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut alice = UserRecord::new("u-1", "acme", "alice");
//! alice.active = true;
//! let claims = alice.claims()?;
//!
//! let mut source = InMemoryUserSource::new(vec![alice.clone()]);
//! let cache = TokenFreshnessCache::new();
//! cache.reload(&source, RebuildTrigger::Startup)?;
//! cache.check(&claims)?;
//!
//! // Changing a fingerprinted field invalidates the token
//! alice.username = "alice2".into();
//! source.upsert(alice);
//! cache.reload(&source, RebuildTrigger::UserUpdated)?;
//! assert!(cache.check(&claims).is_err());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod error;
pub mod hash;
mod source;
mod srn;
mod token_cache;
mod user;

pub use error::{IdentityError, Result};
pub use source::{InMemoryUserSource, RebuildTrigger, UserSource};
pub use srn::{Srn, DEFAULT_NAMESPACE};
pub use token_cache::TokenFreshnessCache;
pub use user::{AuthPayload, UserRecord, UserSignature};
