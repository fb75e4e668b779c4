use app_utils::GateConfig;
use colored::*;
use core_identity::{Srn, UserRecord};
use std::fs;
use std::path::Path;

pub fn fingerprint(file_path: &Path, claims: bool, config: &GateConfig) -> anyhow::Result<()> {
    let content = fs::read_to_string(file_path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file_path.display(), e))?;
    let mut user: UserRecord = serde_json::from_str(&content)?;

    if user.srn.is_empty() {
        user.srn = Srn::user(&config.srn.namespace, &user.org, &user.username).to_string();
    }

    if claims {
        println!("{}", serde_json::to_string_pretty(&user.claims()?)?);
        return Ok(());
    }

    println!("  {} User: {} ({})", "✓".green(), user.username, user.id);
    println!("  {} SRN: {}", "✓".green(), user.srn.cyan());
    if !user.active {
        println!("  {} User is inactive; its tokens will be rejected", "⚠".yellow());
    }
    println!("{}", user.fingerprint()?);

    Ok(())
}
