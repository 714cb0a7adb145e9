//! CLI subcommands and the wiring they share
//!
//! Every command receives a [`CommandContext`] built from the global flags
//! and returns an [`ExitStatus`]. An `Err` from a command is a precondition
//! failure: nothing was uploaded.

pub mod config;
pub mod readme;
pub mod upload;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::info;

use ghupload_core::config::Config;
use ghupload_core::domain::BatchReport;
use ghupload_core::ports::RepositoryInfo;
use ghupload_core::usecases::ReconcileFileUseCase;
use ghupload_github::client::GitHubClient;
use ghupload_github::provider::{GitHubRemoteStore, GitHubRepositoryHost};
use ghupload_sync::filesystem::LocalFileSystemAdapter;

use crate::output::{get_formatter, OutputFormat, OutputFormatter};

/// Process exit status of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// The command completed; per-file failures may still be present
    Success,
    /// Nothing was processed (bad path, missing token, auth or repository failure)
    Precondition,
    /// The run completed with failures and the caller asked to be told
    FileFailures,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Precondition => 1,
            ExitStatus::FileFailures => 2,
        }
    }

    /// Status for a finished batch
    ///
    /// With `fail_on_error`, an incomplete run (failures, a failed README
    /// or cancellation) is reported as [`ExitStatus::FileFailures`].
    pub fn for_report(report: &BatchReport, readme_failed: bool, fail_on_error: bool) -> Self {
        let incomplete = report.has_failures() || readme_failed || report.cancelled;
        if fail_on_error && incomplete {
            ExitStatus::FileFailures
        } else {
            ExitStatus::Success
        }
    }
}

/// Global options shared by every command
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub format: OutputFormat,
    pub quiet: bool,
    pub config_path: PathBuf,
    /// Whether `config_path` came from `--config`
    pub explicit_config: bool,
    pub token: Option<String>,
}

impl CommandContext {
    pub fn new(
        format: OutputFormat,
        quiet: bool,
        config_path: Option<PathBuf>,
        token: Option<String>,
    ) -> Self {
        let explicit_config = config_path.is_some();
        Self {
            format,
            quiet,
            config_path: config_path.unwrap_or_else(Config::default_path),
            explicit_config,
            token,
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    pub fn formatter(&self) -> Box<dyn OutputFormatter> {
        get_formatter(self.format, self.quiet)
    }

    /// Loads the configuration file
    ///
    /// A missing default file means defaults; a missing `--config` file or
    /// one that fails to parse is an error.
    pub fn load_config(&self) -> Result<Config> {
        if self.config_path.exists() {
            let config = Config::load(&self.config_path).with_context(|| {
                format!(
                    "Failed to load configuration from {}",
                    self.config_path.display()
                )
            })?;
            info!(config_path = %self.config_path.display(), "Loaded configuration");
            Ok(config)
        } else if self.explicit_config {
            bail!(
                "Configuration file not found: {}",
                self.config_path.display()
            )
        } else {
            Ok(Config::default())
        }
    }

    /// The GitHub token from `--token`, `GITHUB_TOKEN` or a `.env` file
    pub fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .context("No GitHub token provided. Pass --token, set GITHUB_TOKEN or add it to .env")
    }
}

/// Fails with every validation problem of `config`
pub fn ensure_valid(config: &Config) -> Result<()> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    bail!("Invalid configuration: {}", messages.join("; "))
}

/// An authenticated connection to the GitHub API
pub struct GitHubSession {
    pub client: Arc<GitHubClient>,
    pub host: Arc<GitHubRepositoryHost>,
    pub login: String,
}

impl GitHubSession {
    /// Builds the client from `config` and checks the token against `/user`
    ///
    /// Every request, including this check and the repository lookup, is
    /// bounded by `sync.request_timeout_secs`.
    pub async fn connect(token: &str, config: &Config) -> Result<Self> {
        let client = GitHubClient::with_base_url(token, &config.github.api_base_url)
            .and_then(|c| c.with_timeout(config.reconcile_options().request_timeout))
            .context("Failed to create GitHub client")?
            .with_user_agent(config.github.user_agent.clone());
        let client = Arc::new(client);
        let host = Arc::new(GitHubRepositoryHost::new(Arc::clone(&client)));

        let login = host
            .authenticated_login()
            .await
            .context("GitHub authentication failed")?
            .to_string();
        info!(login = %login, "Authenticated with GitHub");

        Ok(Self {
            client,
            host,
            login,
        })
    }

    /// Reconciler writing into `repository`
    pub fn reconciler(
        &self,
        repository: &RepositoryInfo,
        config: &Config,
    ) -> Result<Arc<ReconcileFileUseCase>> {
        let store = GitHubRemoteStore::for_repository(Arc::clone(&self.client), repository)?;
        Ok(Arc::new(ReconcileFileUseCase::new(
            Arc::new(store),
            Arc::new(LocalFileSystemAdapter::new()),
            config.reconcile_options(),
        )))
    }
}
