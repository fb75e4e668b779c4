use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "datagate")]
#[command(version, about = "Datagate policy & authorization CLI", long_about = None)]
struct Cli {
    /// Gateway configuration file (TOML or YAML); defaults plus environment otherwise
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Policy validation
    Policy {
        #[command(subcommand)]
        command: PolicyCommands,
    },
    /// Simulate a request against a policy file
    Authorize(commands::authorize::AuthorizeArgs),
    /// User record utilities
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
enum PolicyCommands {
    /// Validate a policy file (JSON, TOML or YAML)
    Check {
        /// Path to the policy file
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Print the fingerprint a token for this user must carry
    Fingerprint {
        /// Path to a JSON user record
        file: PathBuf,

        /// Print the full token claims instead
        #[arg(long)]
        claims: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Policy { command } => match command {
            PolicyCommands::Check { file } => {
                commands::policy::check(&file, &config)?;
            }
        },
        Commands::Authorize(args) => {
            commands::authorize::run(&args, &config)?;
        }
        Commands::User { command } => match command {
            UserCommands::Fingerprint { file, claims } => {
                commands::user::fingerprint(&file, claims, &config)?;
            }
        },
    }

    Ok(())
}
