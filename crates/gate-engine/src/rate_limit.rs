//! Rate-limit plans handed to the external limiter

use app_utils::config::RateLimitConfig;
use core_identity::AuthPayload;
use core_policy::{
    derive_rate_limit, MatchSettings, RateLimitKey, RequestContext, RequestTarget,
    DEFAULT_MAX_REQUESTS, DEFAULT_TIME_WINDOW_MS,
};
use serde::Serialize;
use std::time::Duration;

/// Process-wide rate-limit defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    /// Budget used when no matched statement sets one
    pub max_requests: u64,
    /// Window every budget applies to
    pub time_window: Duration,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            time_window: Duration::from_millis(DEFAULT_TIME_WINDOW_MS),
        }
    }
}

impl From<&RateLimitConfig> for RateLimitSettings {
    fn from(config: &RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests,
            time_window: Duration::from_millis(config.time_window_ms),
        }
    }
}

/// What the limiter should enforce for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    /// Bucket the request counts against
    #[serde(serialize_with = "serialize_key")]
    pub key: RateLimitKey,
    /// Requests allowed in the window
    pub max_requests: u64,
    /// Window length
    #[serde(serialize_with = "serialize_window")]
    pub time_window: Duration,
}

impl RateLimitDecision {
    /// Plan the limit for `target` as requested by `payload`
    ///
    /// Matching is re-run here rather than reusing an authorization result,
    /// since the limiter runs before request bodies are validated.
    pub fn derive(
        payload: &AuthPayload,
        context: &RequestContext,
        target: &RequestTarget<'_>,
        settings: &MatchSettings,
        defaults: &RateLimitSettings,
    ) -> Self {
        Self {
            key: RateLimitKey::for_caller(payload.caller_id(), &context.source_ip),
            max_requests: derive_rate_limit(
                payload.policy.statements(),
                target,
                settings,
                defaults.max_requests,
            ),
            time_window: defaults.time_window,
        }
    }
}

fn serialize_key<S: serde::Serializer>(
    key: &RateLimitKey,
    s: S,
) -> Result<S::Ok, S::Error> {
    s.serialize_str(key.as_str())
}

fn serialize_window<S: serde::Serializer>(
    window: &Duration,
    s: S,
) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(window.as_millis()).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_policy::{Constraint, Policy, Statement};

    fn payload(id: Option<&str>, budget: Option<u64>) -> AuthPayload {
        let mut statement = Statement::new("data:*", "acme.*");
        if let Some(budget) = budget {
            statement = statement.with_constraint(Constraint::max_requests(budget));
        }
        AuthPayload {
            id: id.map(str::to_string),
            policy: Policy::new().add_statement(statement).unwrap(),
            ..AuthPayload::default()
        }
    }

    #[test]
    fn test_keyed_on_caller_when_known() {
        let context = RequestContext::new("10.0.0.1", "localhost");
        let target = RequestTarget::new("data", "find").on("acme", "users");
        let decision = RateLimitDecision::derive(
            &payload(Some("u-1"), Some(5)),
            &context,
            &target,
            &MatchSettings::default(),
            &RateLimitSettings::default(),
        );

        assert_eq!(decision.key, RateLimitKey::User("u-1".into()));
        assert_eq!(decision.max_requests, 5);
        assert_eq!(decision.time_window, Duration::from_secs(60));
    }

    #[test]
    fn test_keyed_on_ip_and_default_budget() {
        let context = RequestContext::new("10.0.0.1", "localhost");
        let target = RequestTarget::new("data", "find").on("acme", "users");
        let defaults = RateLimitSettings {
            max_requests: 9,
            time_window: Duration::from_millis(500),
        };
        let decision = RateLimitDecision::derive(
            &payload(None, None),
            &context,
            &target,
            &MatchSettings::default(),
            &defaults,
        );

        assert_eq!(decision.key, RateLimitKey::SourceIp("10.0.0.1".into()));
        assert_eq!(decision.max_requests, 9);

        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"key": "10.0.0.1", "max_requests": 9, "time_window": 500})
        );
    }
}
