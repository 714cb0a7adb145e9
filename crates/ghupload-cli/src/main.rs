//! GitHub Uploader CLI - Upload a local project folder to a GitHub repository
//!
//! Provides commands for:
//! - Uploading a directory tree (create-or-update per file)
//! - Writing the generated README on its own
//! - Inspecting the configuration

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{
    config::ConfigCommand, readme::ReadmeCommand, upload::UploadCommand, CommandContext,
    ExitStatus,
};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "ghupload",
    version,
    about = "Upload project folders to GitHub repositories"
)]
pub struct Cli {
    /// GitHub token with repo scope (also read from a `.env` file)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload a local directory to a repository
    Upload(UploadCommand),
    /// Create or update README.md only
    Readme(ReadmeCommand),
    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Log filter when `RUST_LOG` is not set
///
/// `-v` and `-vv` win over the configured level; `-q` keeps only errors.
fn log_filter(verbose: u8, quiet: bool, configured: &str) -> String {
    match verbose {
        0 if quiet => "error".to_string(),
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // `.env` fills in GITHUB_TOKEN; variables already set are kept
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    let ctx = CommandContext::new(format, cli.quiet, cli.config.clone(), cli.token.clone());

    // Setup tracing; logs go to stderr so stdout stays machine-readable
    let configured = ctx
        .load_config()
        .map(|config| config.logging.level)
        .unwrap_or_else(|_| "info".to_string());
    let filter = log_filter(cli.verbose, cli.quiet, &configured);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Upload(cmd) => cmd.execute(&ctx).await,
        Commands::Readme(cmd) => cmd.execute(&ctx).await,
        Commands::Config(cmd) => cmd.execute(&ctx).await,
    };

    let status = match result {
        Ok(status) => status,
        Err(e) => {
            ctx.formatter().error(&format!("{:#}", e));
            ExitStatus::Precondition
        }
    };
    ExitCode::from(status.code())
}
