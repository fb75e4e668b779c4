use app_utils::{load_policy, GateConfig};
use clap::Args;
use colored::*;
use core_identity::AuthPayload;
use core_policy::RequestContext;
use gate_engine::{parse_action, parse_resource, AuthorizationService, RateLimitSettings};
use std::path::PathBuf;

#[derive(Args)]
pub struct AuthorizeArgs {
    /// Policy file to evaluate (JSON, TOML or YAML)
    #[arg(short, long)]
    policy: PathBuf,

    /// Requested action, e.g. `data:find`
    #[arg(short, long)]
    action: String,

    /// Target resource, e.g. `acme.users`; omit for unscoped operations
    #[arg(short, long)]
    resource: Option<String>,

    /// Source IP of the simulated request
    #[arg(long, default_value = "127.0.0.1")]
    ip: String,

    /// Host header of the simulated request
    #[arg(long, default_value = "localhost")]
    hostname: String,

    /// Caller id used as the rate-limit key
    #[arg(long)]
    user: Option<String>,
}

pub fn run(args: &AuthorizeArgs, config: &GateConfig) -> anyhow::Result<()> {
    let settings = config.match_settings()?;
    let payload = AuthPayload {
        id: args.user.clone(),
        active: true,
        policy: load_policy(&args.policy)?,
        ..AuthPayload::default()
    };

    let (service, method) = parse_action(&args.action, &settings).ok_or_else(|| {
        anyhow::anyhow!(
            "action '{}' has no '{}' separator",
            args.action,
            settings.action_separator()
        )
    })?;
    let (db, collection) = match &args.resource {
        Some(resource) => {
            let (db, collection) = parse_resource(resource, &settings).ok_or_else(|| {
                anyhow::anyhow!(
                    "resource '{}' has no '{}' separator",
                    resource,
                    settings.resource_separator()
                )
            })?;
            (Some(db), Some(collection))
        }
        None => (None, None),
    };

    let context = RequestContext::new(args.ip.as_str(), args.hostname.as_str());
    let authorization = AuthorizationService::new(&payload, service, &context, &settings);

    let decision = authorization.decide(collection, db, method);
    for reason in &decision.reasons {
        if decision.allowed {
            println!("{} {}", "✓".green(), reason);
        } else {
            println!("{} {}", "✗".red(), reason);
        }
    }

    let plan = authorization.rate_limit(
        collection,
        db,
        method,
        &RateLimitSettings::from(&config.rate_limit),
    );
    println!(
        "  Rate limit: {} request(s) per {} ms for '{}'",
        plan.max_requests,
        plan.time_window.as_millis(),
        plan.key
    );
    println!("  Evaluated in {} µs", decision.evaluation_time_us);

    if decision.allowed {
        Ok(())
    } else {
        anyhow::bail!("request denied")
    }
}
