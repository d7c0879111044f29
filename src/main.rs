// src/main.rs
// FileFlow - filesystem and interactive shell tools over MCP

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use fileflow::config::EnvConfig;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env files (global first, then project - project overrides)
    if let Some(home) = dirs::home_dir() {
        let _ = dotenvy::from_path(home.join(".fileflow/.env"));
    }
    let _ = dotenvy::dotenv(); // Load .env from current directory

    let cli = Cli::parse();

    // Set up logging based on command
    let default_level = match &cli.command {
        Some(Commands::Serve) | None => Level::WARN, // Quiet for MCP stdio
        Some(Commands::Run { .. }) => Level::WARN,   // Terminal carries the command's output
        Some(Commands::Tool { .. }) => Level::INFO,
        Some(Commands::Config) => Level::INFO,
    };
    let log_level = EnvConfig::log_level_override().unwrap_or(default_level);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        None | Some(Commands::Serve) => {
            cli::run_mcp_server().await?;
        }
        Some(Commands::Tool { name, args }) => {
            cli::run_tool(name, args).await?;
        }
        Some(Commands::Run {
            dir,
            confirm,
            command,
        }) => {
            cli::run_command(dir, confirm, command).await?;
        }
        Some(Commands::Config) => {
            cli::run_config()?;
        }
    }

    Ok(())
}
