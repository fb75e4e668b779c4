//! Error types for core-policy

use alloc::string::String;
use core::fmt;

/// Result type alias for policy operations
pub type Result<T> = core::result::Result<T, PolicyError>;

/// Errors that can occur while loading or evaluating a policy
#[derive(Debug)]
pub enum PolicyError {
    // ===== Authorization Denials =====
    /// The caller's policy carries no statements at all
    PolicyInvalid,

    /// No allowed statement matches the requested action and resource
    PermissionDenied,

    /// Matched statements restrict source IPs and the request IP is not one of them
    ConstraintViolationIp {
        /// Source IP of the rejected request
        ip: String,
    },

    /// Matched statements restrict hostnames and the request hostname is not one of them
    ConstraintViolationHostname {
        /// Hostname (as presented, port included) of the rejected request
        hostname: String,
    },

    // ===== Construction Errors =====
    /// A constraint carried a `type` discriminator that has no variant
    UnknownConstraintType(String),

    /// A constraint value has the wrong shape for its variant
    InvalidConstraintValue {
        /// Constraint discriminator
        kind: &'static str,
        /// What was wrong with the value
        reason: String,
    },

    /// Invalid statement (missing action or resource)
    InvalidStatement(String),

    /// Matcher settings are unusable (empty separator or wildcard)
    InvalidSettings(String),

    /// Serialization error
    SerializationError(String),

    /// TOML parsing error
    TomlError(toml::de::Error),

    // ===== DoS Prevention Errors =====
    /// Policy exceeds maximum allowed statements
    TooManyStatements {
        /// Maximum allowed statements
        max: usize,
        /// Attempted number of statements
        attempted: usize,
    },

    /// Action or resource pattern exceeds maximum length
    PatternTooLong {
        /// Maximum allowed length
        max: usize,
        /// Actual pattern length
        length: usize,
    },
}

impl PolicyError {
    /// Whether this error is a denial of an otherwise well-formed request
    ///
    /// Denials are expected outcomes of evaluation; everything else points at
    /// malformed policy data or configuration.
    #[must_use]
    pub const fn is_denial(&self) -> bool {
        matches!(
            self,
            Self::PolicyInvalid
                | Self::PermissionDenied
                | Self::ConstraintViolationIp { .. }
                | Self::ConstraintViolationHostname { .. }
        )
    }
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PolicyInvalid => {
                write!(f, "Policy is invalid: No valid policy statement provided")
            }
            Self::PermissionDenied => {
                write!(f, "You do not have permission to perform the request")
            }
            Self::ConstraintViolationIp { ip } => write!(
                f,
                "Invalid IP: Requests from {} are not allowed by your Policy",
                ip
            ),
            Self::ConstraintViolationHostname { hostname } => write!(
                f,
                "Invalid hostname: Requests from {} are not allowed by your Policy",
                hostname
            ),
            Self::UnknownConstraintType(kind) => {
                write!(f, "Unknown constraint type: {}", kind)
            }
            Self::InvalidConstraintValue { kind, reason } => {
                write!(f, "Invalid value for '{}' constraint: {}", kind, reason)
            }
            Self::InvalidStatement(msg) => write!(f, "Invalid policy statement: {}", msg),
            Self::InvalidSettings(msg) => write!(f, "Invalid matcher settings: {}", msg),
            Self::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Self::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            Self::TooManyStatements { max, attempted } => write!(
                f,
                "Policy exceeds maximum {} statements (attempted: {})",
                max, attempted
            ),
            Self::PatternTooLong { max, length } => write!(
                f,
                "Statement pattern exceeds maximum {} characters (length: {})",
                max, length
            ),
        }
    }
}

impl From<toml::de::Error> for PolicyError {
    fn from(err: toml::de::Error) -> Self {
        Self::TomlError(err)
    }
}

impl core::error::Error for PolicyError {}
