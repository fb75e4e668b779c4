//! Where the freshness cache gets its users from

use crate::error::Result;
use crate::user::UserRecord;
use std::fmt;

/// A store that can produce a full snapshot of all users
///
/// Implemented by the embedding application over its database; the cache
/// only ever asks for complete snapshots.
pub trait UserSource: Send + Sync {
    /// Every user currently known to the store
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Source` if the store cannot be read
    fn users(&self) -> Result<Vec<UserRecord>>;
}

/// A [`UserSource`] backed by a vector, for tests and single-process setups
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserSource {
    users: Vec<UserRecord>,
}

impl InMemoryUserSource {
    /// Create a source holding `users`
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self { users }
    }

    /// Insert `user`, replacing any user with the same id
    pub fn upsert(&mut self, user: UserRecord) {
        match self.users.iter_mut().find(|existing| existing.id == user.id) {
            Some(existing) => *existing = user,
            None => self.users.push(user),
        }
    }

    /// Remove the user with `id`
    pub fn remove(&mut self, id: &str) -> Option<UserRecord> {
        let idx = self.users.iter().position(|user| user.id == id)?;
        Some(self.users.remove(idx))
    }

    /// Look up a user by id
    pub fn get(&self, id: &str) -> Option<&UserRecord> {
        self.users.iter().find(|user| user.id == id)
    }

    /// Number of users held
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether no users are held
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl FromIterator<UserRecord> for InMemoryUserSource {
    fn from_iter<I: IntoIterator<Item = UserRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl UserSource for InMemoryUserSource {
    fn users(&self) -> Result<Vec<UserRecord>> {
        Ok(self.users.clone())
    }
}

/// Events after which the freshness cache must be rebuilt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RebuildTrigger {
    /// Process start, before the first request is served
    Startup,
    /// A user was created
    UserCreated,
    /// A user confirmed their email address
    UserVerified,
    /// A user was activated
    UserActivated,
    /// A fingerprinted field of a user changed (policy, org, username, ...)
    UserUpdated,
    /// A user was deleted; its outstanding tokens must stop working
    UserDeleted,
    /// Operator-requested rebuild
    Manual,
}

impl RebuildTrigger {
    /// Stable name used in logs
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::UserCreated => "user_created",
            Self::UserVerified => "user_verified",
            Self::UserActivated => "user_activated",
            Self::UserUpdated => "user_updated",
            Self::UserDeleted => "user_deleted",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for RebuildTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
