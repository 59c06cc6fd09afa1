use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "carematch")]
#[command(about = "Rank experts, clinical trials and discussions for a query", long_about = None)]
struct Cli {
    /// Path to config.json (defaults to ~/.carematch/config.json)
    #[arg(long = "config", global = true)]
    config_path: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search experts, trials and discussions
    Search(cli::search::SearchArgs),
    /// Manage stored discussions
    Discussions {
        #[command(subcommand)]
        action: cli::discussions::DiscussionAction,
    },
    /// Print the effective configuration
    Config,
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading any CAREMATCH_* overrides
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Some(Commands::Version) | None => {
            println!("carematch {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Search(args)) => {
            let config = cli::load_config(cli.config_path.as_deref())?;
            cli::search::cmd_search(config, args).await?;
        }
        Some(Commands::Discussions { action }) => {
            let config = cli::load_config(cli.config_path.as_deref())?;
            cli::discussions::cmd_discussions(config, action)?;
        }
        Some(Commands::Config) => {
            let config = cli::load_config(cli.config_path.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
