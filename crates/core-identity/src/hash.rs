//! Hash provider abstraction for user fingerprints
//!
//! A fingerprint is the hex-encoded digest of a user's signature claims. It
//! is issued inside every token and compared against the freshness cache, so
//! any change to a fingerprinted field invalidates outstanding tokens.

use crate::error::Result;
use serde::Serialize;

/// Hash provider trait for identity operations
///
/// The fingerprinting logic depends on this abstraction rather than on a
/// concrete algorithm, so tests can substitute a deterministic provider.
pub trait HashProvider {
    /// Hash arbitrary data to a 32-byte digest
    fn hash(&self, data: &[u8]) -> [u8; 32];

    /// Get the name of this hash provider (for debugging/logging)
    fn name(&self) -> &'static str;
}

/// Default Blake3 hash provider
///
/// ## Example
///
/// ```
/// use core_identity::hash::{HashProvider, Blake3HashProvider};
///
/// let provider = Blake3HashProvider;
/// let hash = provider.hash(b"Hello, world!");
/// assert_eq!(hash.len(), 32);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3HashProvider;

impl HashProvider for Blake3HashProvider {
    fn hash(&self, data: &[u8]) -> [u8; 32] {
        blake3::hash(data).into()
    }

    fn name(&self) -> &'static str {
        "blake3"
    }
}

static HASH_PROVIDER: Blake3HashProvider = Blake3HashProvider;

/// Get the process-wide hash provider
///
/// Every fingerprint issued in a token and stored in the freshness cache is
/// computed with this provider, so both sides always agree.
pub fn hash_provider() -> &'static dyn HashProvider {
    &HASH_PROVIDER
}

/// Hex fingerprint of the compact JSON encoding of `value`
///
/// Struct fields are encoded in declaration order, so callers control the
/// canonical form by how they declare the fingerprinted type.
///
/// # Errors
///
/// Returns `IdentityError::Serialization` if `value` cannot be encoded
pub fn fingerprint<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    fingerprint_with(hash_provider(), value)
}

/// [`fingerprint`] with an explicit provider
///
/// # Errors
///
/// Returns `IdentityError::Serialization` if `value` cannot be encoded
pub fn fingerprint_with<P, T>(provider: &P, value: &T) -> Result<String>
where
    P: HashProvider + ?Sized,
    T: Serialize + ?Sized,
{
    let canonical = serde_json::to_vec(value)?;
    Ok(hex::encode(provider.hash(&canonical)))
}
