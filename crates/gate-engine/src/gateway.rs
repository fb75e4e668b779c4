//! Request admission
//!
//! The [`Gateway`] runs the full per-request flow for embedders:
//!
//! 1. the token must match the current user snapshot,
//! 2. its user must be active,
//! 3. the caller's policy must allow the operation,
//! 4. and a rate-limit plan is derived for the external limiter.
//!
//! The first failing step decides the error.

use crate::error::{GateError, Result};
use crate::rate_limit::{RateLimitDecision, RateLimitSettings};
use crate::service::AuthorizationService;
use app_utils::GateConfig;
use core_identity::{AuthPayload, RebuildTrigger, TokenFreshnessCache, UserSource};
use core_policy::{MatchSettings, RequestContext, RequestTarget, Statement};
use std::sync::Arc;
use tracing::{debug, info};

/// A request that passed every admission check
#[derive(Debug, Clone, PartialEq)]
pub struct Admission<'p> {
    /// Statements of the caller's policy that allowed the request
    pub statements: Vec<&'p Statement>,
    /// Limit the request is subject to
    pub rate_limit: RateLimitDecision,
}

/// Admission control shared by all request handlers
#[derive(Debug, Clone)]
pub struct Gateway {
    cache: Arc<TokenFreshnessCache>,
    settings: MatchSettings,
    rate_limit: RateLimitSettings,
}

impl Gateway {
    /// Create a gateway over an existing cache
    pub fn new(
        cache: Arc<TokenFreshnessCache>,
        settings: MatchSettings,
        rate_limit: RateLimitSettings,
    ) -> Self {
        Self {
            cache,
            settings,
            rate_limit,
        }
    }

    /// Create a gateway with settings from `config`
    ///
    /// # Errors
    ///
    /// Returns `GateError::Config` if the configuration does not validate
    pub fn from_config(config: &GateConfig, cache: Arc<TokenFreshnessCache>) -> Result<Self> {
        config.validate()?;
        let settings = config.match_settings()?;
        info!(
            action_separator = settings.action_separator(),
            resource_separator = settings.resource_separator(),
            wildcard = settings.wildcard(),
            max_requests = config.rate_limit.max_requests,
            time_window_ms = config.rate_limit.time_window_ms,
            "gateway configured"
        );
        Ok(Self::new(
            cache,
            settings,
            RateLimitSettings::from(&config.rate_limit),
        ))
    }

    /// Matcher settings in use
    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    /// Rate-limit defaults in use
    pub fn rate_limit_settings(&self) -> &RateLimitSettings {
        &self.rate_limit
    }

    /// The shared freshness cache
    pub fn cache(&self) -> &Arc<TokenFreshnessCache> {
        &self.cache
    }

    /// Rebuild the freshness cache from `source`
    ///
    /// # Errors
    ///
    /// Returns `GateError::Identity` if the source or a fingerprint fails
    pub fn rebuild(&self, source: &dyn UserSource, trigger: RebuildTrigger) -> Result<u64> {
        Ok(self.cache.reload(source, trigger)?)
    }

    /// Whether a token with `id` and `hash` reflects its user
    pub fn is_token_fresh(&self, id: Option<&str>, hash: Option<&str>) -> bool {
        self.cache.is_fresh(id, hash)
    }

    /// Build the per-request authorization service
    pub fn service<'a>(
        &'a self,
        payload: &'a AuthPayload,
        service: &'a str,
        context: &'a RequestContext,
    ) -> AuthorizationService<'a> {
        AuthorizationService::new(payload, service, context, &self.settings)
    }

    /// Run every admission check for `target`
    ///
    /// # Errors
    ///
    /// - `GateError::NotReady` before the first cache rebuild
    /// - `IdentityError::StaleToken` / `IdentityError::Inactive`
    /// - any policy denial from [`AuthorizationService::authorize`]
    pub fn admit<'a>(
        &'a self,
        payload: &'a AuthPayload,
        context: &'a RequestContext,
        target: &RequestTarget<'a>,
    ) -> Result<Admission<'a>> {
        if !self.cache.is_ready() {
            return Err(GateError::NotReady);
        }
        self.cache.check(payload)?;

        let service = AuthorizationService::new(payload, target.service, context, &self.settings);
        service.require_active()?;
        let statements = service.authorize(target.collection, target.db, target.method)?;

        let rate_limit =
            RateLimitDecision::derive(payload, context, target, &self.settings, &self.rate_limit);
        debug!(
            key = %rate_limit.key,
            max_requests = rate_limit.max_requests,
            "request admitted"
        );

        Ok(Admission {
            statements,
            rate_limit,
        })
    }
}
