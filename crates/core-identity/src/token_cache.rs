//! Token freshness tracking
//!
//! Tokens carry a fingerprint of their user taken at issue time. The cache
//! maps every user id to the user's current fingerprint; a token is fresh
//! only while the two agree. Any change to a fingerprinted field therefore
//! invalidates outstanding tokens at the next rebuild.
//!
//! ## Concurrency
//!
//! The map is never mutated in place. A rebuild builds a complete new
//! snapshot and publishes it with a single atomic swap, so readers observe
//! either the old or the new snapshot, never a mix. Lookups are lock-free.

use crate::error::{IdentityError, Result};
use crate::hash::hash_provider;
use crate::source::{RebuildTrigger, UserSource};
use crate::user::{AuthPayload, UserRecord};
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct Snapshot {
    generation: u64,
    entries: HashMap<String, String>,
}

/// Process-wide map of user id to current fingerprint
///
/// Shared between request handlers behind an `Arc`.
///
/// ```
/// use core_identity::{TokenFreshnessCache, UserRecord};
///
/// let mut user = UserRecord::new("1", "acme", "alice");
/// user.hash = Some("a".into());
///
/// let cache = TokenFreshnessCache::new();
/// cache.rebuild([&user]).unwrap();
///
/// assert!(cache.is_fresh(Some("1"), Some("a")));
/// assert!(!cache.is_fresh(Some("1"), Some("b")));
/// ```
#[derive(Debug)]
pub struct TokenFreshnessCache {
    snapshot: ArcSwap<Snapshot>,
    generation: AtomicU64,
    ready: AtomicBool,
}

impl Default for TokenFreshnessCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenFreshnessCache {
    /// Create an empty cache; every token is stale until the first rebuild
    pub fn new() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(Snapshot::default()),
            generation: AtomicU64::new(0),
            ready: AtomicBool::new(false),
        }
    }

    /// Replace the whole map with fingerprints of `users`
    ///
    /// Returns the generation of the published snapshot. When two rebuilds
    /// race, the snapshot with the higher generation is kept.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Serialization` if a fingerprint cannot be
    /// computed; the current snapshot stays in place.
    pub fn rebuild<'a, I>(&self, users: I) -> Result<u64>
    where
        I: IntoIterator<Item = &'a UserRecord>,
    {
        let entries = users
            .into_iter()
            .map(|user| Ok((user.id.clone(), user.fingerprint()?)))
            .collect::<Result<HashMap<_, _>>>()?;

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let count = entries.len();
        let next = Arc::new(Snapshot {
            generation,
            entries,
        });

        self.snapshot.rcu(|current| {
            if current.generation > generation {
                Arc::clone(current)
            } else {
                Arc::clone(&next)
            }
        });
        self.ready.store(true, Ordering::Release);

        info!(
            entries = count,
            generation,
            hasher = hash_provider().name(),
            "token freshness cache rebuilt"
        );
        Ok(generation)
    }

    /// Rebuild from a full snapshot of `source`
    ///
    /// # Errors
    ///
    /// Propagates source and fingerprint errors; the current snapshot stays
    /// in place.
    pub fn reload(&self, source: &dyn UserSource, trigger: RebuildTrigger) -> Result<u64> {
        debug!(%trigger, "reloading token freshness cache");
        let users = source.users()?;
        self.rebuild(&users)
    }

    /// Whether a token with `id` and `hash` matches the current snapshot
    ///
    /// Absent (or empty) id or hash, an unknown id and a differing hash all
    /// count as stale.
    pub fn is_fresh(&self, id: Option<&str>, hash: Option<&str>) -> bool {
        let (Some(id), Some(hash)) = (
            id.filter(|id| !id.is_empty()),
            hash.filter(|hash| !hash.is_empty()),
        ) else {
            return false;
        };

        self.snapshot
            .load()
            .entries
            .get(id)
            .is_some_and(|current| current == hash)
    }

    /// Reject a stale token
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::StaleToken` unless the payload is fresh
    pub fn check(&self, payload: &AuthPayload) -> Result<()> {
        if self.is_fresh(payload.caller_id(), payload.fingerprint()) {
            Ok(())
        } else {
            debug!(id = ?payload.caller_id(), "rejecting stale token");
            Err(IdentityError::StaleToken)
        }
    }

    /// Whether at least one snapshot has been published
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Generation of the current snapshot (0 before the first rebuild)
    pub fn generation(&self) -> u64 {
        self.snapshot.load().generation
    }

    /// Number of users in the current snapshot
    pub fn len(&self) -> usize {
        self.snapshot.load().entries.len()
    }

    /// Whether the current snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
