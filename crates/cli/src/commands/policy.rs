use app_utils::{load_policy, GateConfig};
use colored::*;
use gate_engine::validate_policy;
use std::path::Path;

pub fn check(file_path: &Path, config: &GateConfig) -> anyhow::Result<()> {
    println!("{} {}", "Checking policy:".bold(), file_path.display());

    let policy = load_policy(file_path)?;

    println!(
        "  {} Version: {}",
        "✓".green(),
        policy.version().unwrap_or("(none)")
    );
    println!("  {} Statements: {}", "✓".green(), policy.statements().len());

    let denies = policy
        .statements()
        .iter()
        .filter(|statement| !statement.is_allowed())
        .count();
    if denies > 0 {
        println!(
            "  {} {} deny statement(s) never grant access and are skipped",
            "⚠".yellow(),
            denies
        );
    }

    let diagnostics = validate_policy(&policy, &config.policy);
    for diagnostic in &diagnostics {
        match diagnostic.statement {
            Some(index) => println!(
                "  {} Statement {}: {}",
                "✗".red(),
                index + 1,
                diagnostic.message
            ),
            None => println!("  {} {}", "✗".red(), diagnostic.message),
        }
    }

    println!();
    if diagnostics.is_empty() {
        println!("{} Policy is valid!", "✓".green().bold());
        Ok(())
    } else {
        anyhow::bail!("policy has {} problem(s)", diagnostics.len())
    }
}
