mod commands;

use clap::{Parser, Subcommand};
use followpulse_core::Handle;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "followpulse-cli")]
#[command(about = "Resolve and track Instagram follower counts")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a profile through the fallback chain and print it as JSON.
    Resolve { handle: Handle },
    /// Resolve, record a snapshot, and print the change since the last one.
    Track { handle: Handle },
    /// Print every stored snapshot for a handle, oldest first.
    History { handle: Handle },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = followpulse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Resolve { handle }) => {
            let ctx = commands::Context::from_config(&config)?;
            commands::run_resolve(&ctx, &handle).await?;
        }
        Some(Commands::Track { handle }) => {
            let ctx = commands::Context::from_config(&config)?;
            commands::run_track(&ctx, &handle).await?;
        }
        Some(Commands::History { handle }) => {
            let ctx = commands::Context::from_config(&config)?;
            commands::run_history(&ctx, &handle).await?;
        }
        None => println!("followpulse-cli: try `resolve`, `track`, or `history` (see --help)"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
