use core_policy::PolicyError;
use thiserror::Error;

/// Errors raised while handling user identities and token payloads
#[derive(Error, Debug)]
pub enum IdentityError {
    /// The token does not match the latest known state of its user
    #[error("Authorization token is out of date: please obtain a new token")]
    StaleToken,

    /// The token belongs to a user that has not been activated
    #[error("Authorization token is invalid: User is inactive")]
    Inactive,

    #[error("Invalid token payload: {0}")]
    InvalidPayload(String),

    /// The policy embedded in the token was rejected
    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error("Invalid SRN: {0}")]
    InvalidSrn(String),

    #[error("User source unavailable: {0}")]
    Source(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IdentityError {
    /// Whether the caller must obtain a fresh token to proceed
    #[must_use]
    pub fn is_token_rejection(&self) -> bool {
        matches!(self, Self::StaleToken | Self::Inactive)
    }
}

/// Specific Result type for identity operations
pub type Result<T> = std::result::Result<T, IdentityError>;
