use app_utils::GateConfig;
use std::path::Path;

pub mod authorize;
pub mod policy;
pub mod user;

/// Configuration from `path`, or defaults with environment overrides
pub fn load_config(path: Option<&Path>) -> anyhow::Result<GateConfig> {
    let config = match path {
        Some(path) => GateConfig::load(path)?,
        None => GateConfig::from_env()?,
    };
    Ok(config)
}
