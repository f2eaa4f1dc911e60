//! Spaces CLI - Command-line interface for browsing workspaces.
//!
//! Provides workspace, health, and configuration commands.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{config, health, workspace};
use output::OutputFormat;

const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Spaces - workspace access CLI
#[derive(Parser)]
#[command(
    name = "spaces",
    version,
    about = "Spaces - workspace access CLI",
    long_about = "CLI tool for listing and inspecting the workspaces you can access.",
    propagate_version = true
)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    output: OutputFormat,

    /// API server URL
    #[arg(long, global = true, env = "SPACES_API_URL")]
    api_url: Option<String>,

    /// Bearer token
    #[arg(long, global = true, env = "SPACES_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Workspace operations
    #[command(subcommand)]
    Workspace(workspace::WorkspaceCommands),

    /// Check system health
    Health(health::HealthArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(config::ConfigCommands),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let api_url = cli
        .api_url
        .clone()
        .or_else(|| config::load_value("api-url"))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let token = cli.token.clone().or_else(|| config::load_value("token"));

    let client = client::ApiClient::new(&api_url, token)?;
    let format = cli.output;

    let result = match cli.command {
        Commands::Workspace(cmd) => workspace::execute(cmd, &client, format).await,
        Commands::Health(args) => health::execute(args, &client, format).await,
        Commands::Config(cmd) => config::execute(cmd, format).await,
    };

    if let Err(e) = result {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
