use core_identity::IdentityError;
use core_policy::PolicyError;
use thiserror::Error;

/// Every way a request can be turned away at the gateway
#[derive(Error, Debug)]
pub enum GateError {
    /// Policy evaluation denied the request, or the policy is malformed
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// The token is stale, its user inactive, or its claims malformed
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Configuration could not be loaded or is inconsistent
    #[error(transparent)]
    Config(#[from] app_utils::Error),

    /// No user snapshot has been published yet
    #[error("Token freshness cache is not ready")]
    NotReady,
}

impl GateError {
    /// HTTP status the boundary should answer with
    ///
    /// - 403 for policy and constraint denials
    /// - 401 when the caller must obtain a new token
    /// - 503 before the first user snapshot is loaded
    /// - 500 for everything else
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Policy(err) if err.is_denial() => 403,
            Self::Identity(err) if err.is_token_rejection() => 401,
            Self::NotReady => 503,
            _ => 500,
        }
    }

    /// Message safe to return to the caller
    ///
    /// Denials carry their own user-facing message; internal failures are
    /// reported generically.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self.status_code() {
            500 => "Internal server error".to_string(),
            503 => "Service unavailable".to_string(),
            _ => self.to_string(),
        }
    }

    /// Whether the request was refused by policy (as opposed to failing)
    #[must_use]
    pub fn is_denial(&self) -> bool {
        matches!(self.status_code(), 401 | 403)
    }
}

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, GateError>;
