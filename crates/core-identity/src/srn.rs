//! Service resource names
//!
//! Every user is addressed as `srn:<namespace>:<org>::user/<username>`.

use crate::error::IdentityError;
use std::fmt;
use std::str::FromStr;

/// Namespace used when none is configured
pub const DEFAULT_NAMESPACE: &str = "coeus";

const USER_SEGMENT: &str = "::user/";

/// Service resource name of a user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Srn {
    namespace: String,
    org: String,
    username: String,
}

impl Srn {
    /// Build the SRN of `username` in `org`
    ///
    /// ```
    /// use core_identity::Srn;
    ///
    /// let srn = Srn::user("coeus", "acme", "alice");
    /// assert_eq!(srn.to_string(), "srn:coeus:acme::user/alice");
    /// ```
    pub fn user(
        namespace: impl Into<String>,
        org: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            org: org.into(),
            username: username.into(),
        }
    }

    /// Namespace segment
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Organisation segment
    pub fn org(&self) -> &str {
        &self.org
    }

    /// Username segment
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Display for Srn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "srn:{}:{}{}{}",
            self.namespace, self.org, USER_SEGMENT, self.username
        )
    }
}

impl FromStr for Srn {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || IdentityError::InvalidSrn(s.to_string());

        let rest = s.strip_prefix("srn:").ok_or_else(invalid)?;
        let (namespace, rest) = rest.split_once(':').ok_or_else(invalid)?;
        let (org, username) = rest.split_once(USER_SEGMENT).ok_or_else(invalid)?;

        if namespace.is_empty() || org.is_empty() || username.is_empty() {
            return Err(invalid());
        }

        Ok(Self::user(namespace, org, username))
    }
}
