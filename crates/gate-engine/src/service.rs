//! Per-request authorization
//!
//! An [`AuthorizationService`] is created for each request from the token
//! claims, the service that received the request and the network context.
//! It carries no state of its own beyond those borrows.

use crate::error::Result;
use crate::rate_limit::{RateLimitDecision, RateLimitSettings};
use crate::types::AuthDecision;
use core_identity::{AuthPayload, IdentityError};
use core_policy::{MatchSettings, PolicyAuthorizer, RequestContext, RequestTarget, Statement};
use std::time::Instant;
use tracing::{debug, warn};

/// Authorizes the operations of one request
///
/// ## Example
///
/// ```
/// use core_identity::AuthPayload;
/// use core_policy::{MatchSettings, Policy, RequestContext, Statement};
/// use gate_engine::AuthorizationService;
///
/// let payload = AuthPayload {
///     policy: Policy::new()
///         .add_statement(Statement::new(vec!["data:find", "data:update"], "acme.*"))
///         .unwrap(),
///     ..AuthPayload::default()
/// };
/// let context = RequestContext::new("127.0.0.1", "localhost:80");
/// let settings = MatchSettings::default();
/// let service = AuthorizationService::new(&payload, "data", &context, &settings);
///
/// assert_eq!(service.authorize(Some("users"), Some("acme"), "find").unwrap().len(), 1);
/// let denied = service.authorize(Some("users"), Some("acme"), "delete").unwrap_err();
/// assert_eq!(denied.status_code(), 403);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationService<'a> {
    payload: &'a AuthPayload,
    service: &'a str,
    context: &'a RequestContext,
    settings: &'a MatchSettings,
}

impl<'a> AuthorizationService<'a> {
    /// Create a service for one request
    pub fn new(
        payload: &'a AuthPayload,
        service: &'a str,
        context: &'a RequestContext,
        settings: &'a MatchSettings,
    ) -> Self {
        Self {
            payload,
            service,
            context,
            settings,
        }
    }

    /// Service the request was addressed to
    pub fn service(&self) -> &'a str {
        self.service
    }

    /// Statements of the caller's policy that allow `method` on
    /// `db.collection`
    ///
    /// Either of `collection` and `db` may be absent for operations that
    /// are not collection-scoped.
    ///
    /// # Errors
    ///
    /// Returns `GateError::Policy` with `PolicyInvalid`, `PermissionDenied`,
    /// `ConstraintViolationIp` or `ConstraintViolationHostname`
    pub fn authorize(
        &self,
        collection: Option<&'a str>,
        db: Option<&'a str>,
        method: &'a str,
    ) -> Result<Vec<&'a Statement>> {
        let target = self.target(collection, db, method);

        match PolicyAuthorizer::new(&self.payload.policy, self.settings)
            .authorize(&target, self.context)
        {
            Ok(matched) => {
                debug!(
                    service = self.service,
                    method,
                    db,
                    collection,
                    matched = matched.len(),
                    "request authorized"
                );
                Ok(matched)
            }
            Err(err) => {
                warn!(
                    service = self.service,
                    method,
                    db,
                    collection,
                    source_ip = %self.context.source_ip,
                    reason = %err,
                    "request denied"
                );
                Err(err.into())
            }
        }
    }

    /// Reject tokens issued to users that are not active
    ///
    /// # Errors
    ///
    /// Returns `GateError::Identity(IdentityError::Inactive)`
    pub fn require_active(&self) -> Result<()> {
        if self.payload.active {
            Ok(())
        } else {
            warn!(id = ?self.payload.caller_id(), "token of inactive user");
            Err(IdentityError::Inactive.into())
        }
    }

    /// Rate-limit plan for `method` on `db.collection`
    pub fn rate_limit(
        &self,
        collection: Option<&'a str>,
        db: Option<&'a str>,
        method: &'a str,
        defaults: &RateLimitSettings,
    ) -> RateLimitDecision {
        let target = self.target(collection, db, method);
        RateLimitDecision::derive(self.payload, self.context, &target, self.settings, defaults)
    }

    /// Non-failing summary of [`Self::authorize`], for tooling
    pub fn decide(
        &self,
        collection: Option<&'a str>,
        db: Option<&'a str>,
        method: &'a str,
    ) -> AuthDecision {
        let start = Instant::now();
        let result = self.authorize(collection, db, method);
        let evaluation_time_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);

        let resource = match (db, collection) {
            (Some(db), Some(collection)) => {
                format!("{}{}{}", db, self.settings.resource_separator(), collection)
            }
            _ => "(unscoped)".to_string(),
        };
        let action = format!("{}{}{}", self.service, self.settings.action_separator(), method);

        match result {
            Ok(matched) => AuthDecision {
                allowed: true,
                reasons: vec![format!(
                    "ALLOWED: {} on {} granted by {} statement(s)",
                    action,
                    resource,
                    matched.len()
                )],
                matched: matched.len(),
                evaluation_time_us,
            },
            Err(err) => AuthDecision {
                allowed: false,
                reasons: vec![format!("DENIED: {} on {}: {}", action, resource, err)],
                matched: 0,
                evaluation_time_us,
            },
        }
    }

    fn target(
        &self,
        collection: Option<&'a str>,
        db: Option<&'a str>,
        method: &'a str,
    ) -> RequestTarget<'a> {
        RequestTarget {
            service: self.service,
            method,
            db,
            collection,
        }
    }
}
