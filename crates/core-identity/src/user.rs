//! User records and the token payloads issued for them

use crate::error::{IdentityError, Result};
use crate::hash::fingerprint;
use core_policy::{Policy, PolicyDocument};
use serde::{Deserialize, Serialize};

/// Snapshot of a stored user, as read from the user store
///
/// Only `id` is required; every other field defaults so partial projections
/// of the store can still seed the freshness cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique user identifier
    pub id: String,
    /// Whether the user has been activated
    #[serde(default)]
    pub active: bool,
    /// Whether the user confirmed their email address
    #[serde(default)]
    pub verified: bool,
    /// Organisation the user belongs to
    #[serde(default)]
    pub org: String,
    /// Login name
    #[serde(default)]
    pub username: String,
    /// Service resource name, see [`crate::Srn`]
    #[serde(default)]
    pub srn: String,
    /// Access policy of the user
    #[serde(default)]
    pub policy: Policy,
    /// Contact address; not part of the fingerprint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Fingerprint stored alongside the record, if the store keeps one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// Claims covered by a user's fingerprint
///
/// Fields are declared in alphabetical order; the JSON encoding of this
/// struct is the canonical form that gets hashed. Password, email and the
/// verified flag are deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserSignature<'a> {
    /// Activation flag
    pub active: bool,
    /// User identifier
    pub id: &'a str,
    /// Organisation
    pub org: &'a str,
    /// Access policy
    pub policy: &'a Policy,
    /// Service resource name
    pub srn: &'a str,
    /// Login name
    pub username: &'a str,
}

impl UserRecord {
    /// Create an inactive user with an empty policy
    pub fn new(id: impl Into<String>, org: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            org: org.into(),
            username: username.into(),
            ..Self::default()
        }
    }

    /// Claims covered by this user's fingerprint
    #[must_use]
    pub fn signature(&self) -> UserSignature<'_> {
        UserSignature {
            active: self.active,
            id: &self.id,
            org: &self.org,
            policy: &self.policy,
            srn: &self.srn,
            username: &self.username,
        }
    }

    /// The stored fingerprint, or one computed from [`Self::signature`]
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Serialization` if the signature cannot be encoded
    pub fn fingerprint(&self) -> Result<String> {
        match &self.hash {
            Some(hash) => Ok(hash.clone()),
            None => fingerprint(&self.signature()),
        }
    }

    /// Token claims to issue for this user
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Serialization` if the fingerprint cannot be computed
    pub fn claims(&self) -> Result<AuthPayload> {
        Ok(AuthPayload {
            id: Some(self.id.clone()),
            hash: Some(self.fingerprint()?),
            active: self.active,
            policy: self.policy.clone(),
            org: self.org.clone(),
            username: self.username.clone(),
            srn: self.srn.clone(),
        })
    }
}

/// Verified claims of a bearer token
///
/// Token signature verification happens upstream; this type only gives the
/// decoded claims a shape. Unknown claims (`iat`, `exp`, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    /// Identifier of the user the token was issued to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Fingerprint of the user at issue time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Activation flag at issue time
    #[serde(default)]
    pub active: bool,
    /// Policy the request is evaluated against
    #[serde(default)]
    pub policy: Policy,
    /// Organisation
    #[serde(default)]
    pub org: String,
    /// Login name
    #[serde(default)]
    pub username: String,
    /// Service resource name
    #[serde(default)]
    pub srn: String,
}

impl AuthPayload {
    /// Decode claims from JSON
    ///
    /// The embedded policy is validated (size limits, known constraint types)
    /// as part of decoding.
    ///
    /// # Errors
    ///
    /// - `IdentityError::InvalidPayload` if the claims are malformed
    /// - `IdentityError::Policy` if the embedded policy is rejected, e.g.
    ///   with `PolicyError::UnknownConstraintType`
    pub fn from_json(json: &str) -> Result<Self> {
        let claims: ClaimsDocument =
            serde_json::from_str(json).map_err(|e| IdentityError::InvalidPayload(e.to_string()))?;
        claims.try_into()
    }

    /// Decode claims from an already parsed JSON value
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_json`]
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let claims: ClaimsDocument = serde_json::from_value(value)
            .map_err(|e| IdentityError::InvalidPayload(e.to_string()))?;
        claims.try_into()
    }

    /// Caller identifier, treating an empty id as absent
    #[must_use]
    pub fn caller_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Token fingerprint, treating an empty hash as absent
    #[must_use]
    pub fn fingerprint(&self) -> Option<&str> {
        self.hash.as_deref().filter(|hash| !hash.is_empty())
    }
}

/// Claims as they arrive, before the embedded policy is checked
#[derive(Deserialize)]
struct ClaimsDocument {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    hash: Option<String>,
    #[serde(default)]
    active: bool,
    #[serde(default)]
    policy: PolicyDocument,
    #[serde(default)]
    org: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    srn: String,
}

impl TryFrom<ClaimsDocument> for AuthPayload {
    type Error = IdentityError;

    fn try_from(claims: ClaimsDocument) -> Result<Self> {
        Ok(Self {
            id: claims.id,
            hash: claims.hash,
            active: claims.active,
            policy: Policy::try_from(claims.policy)?,
            org: claims.org,
            username: claims.username,
            srn: claims.srn,
        })
    }
}
