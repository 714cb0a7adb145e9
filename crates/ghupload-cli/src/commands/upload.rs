//! Upload command - Synchronize a local directory into a GitHub repository
//!
//! Provides the `ghupload upload` CLI command which:
//! 1. Loads configuration and applies the command-line overrides
//! 2. Checks the upload root and the GitHub token
//! 3. Resolves (or creates) the target repository
//! 4. Runs the batch runner with progress output, then syncs the README

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use ghupload_core::config::{Config, ConfigBuilder};
use ghupload_core::domain::newtypes::{BranchName, RepoSlug};
use ghupload_core::domain::{BatchReport, SyncOutcome};
use ghupload_core::ports::RepositoryInfo;
use ghupload_core::usecases::{
    CreateRequest, EnsureRepositoryUseCase, EnsuredRepository, SyncReadmeUseCase,
};
use ghupload_sync::engine::{BatchProgress, BatchRunner, ProgressCallback};

use super::{ensure_valid, CommandContext, ExitStatus, GitHubSession};
use crate::output::{format_duration, plural, OutputFormat};

#[derive(Debug, Args)]
pub struct UploadCommand {
    /// Target repository, `owner/name` or a name owned by the token's account
    #[arg(long)]
    pub repo: RepoSlug,

    /// Local directory to upload
    #[arg(long, value_name = "DIR")]
    pub path: PathBuf,

    /// Branch to write to [default: sync.branch from config, "main"]
    #[arg(long)]
    pub branch: Option<String>,

    /// Prefix for commit messages, e.g. "Initial import: Add src/main.rs"
    #[arg(long)]
    pub message: Option<String>,

    /// Repository description, used on creation and in the README
    #[arg(long, default_value = "")]
    pub description: String,

    /// Create the repository as private
    #[arg(long)]
    pub private: bool,

    /// Create the repository when it does not exist
    #[arg(long)]
    pub create: bool,

    /// Do not write README.md after the upload
    #[arg(long)]
    pub no_readme: bool,

    /// List the files that would be uploaded without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Number of files reconciled at once (1-16)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Timeout for each GitHub request
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Exit with status 2 when any file failed
    #[arg(long)]
    pub fail_on_error: bool,
}

impl UploadCommand {
    /// Configuration with this command's flags applied on top of `config`
    pub fn effective_config(&self, config: Config) -> Config {
        let mut builder = ConfigBuilder::from_config(config);
        if let Some(branch) = &self.branch {
            builder = builder.sync_branch(branch.clone());
        }
        if let Some(concurrency) = self.concurrency {
            builder = builder.sync_concurrency(concurrency);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.sync_request_timeout_secs(timeout);
        }
        if let Some(message) = &self.message {
            builder = builder.sync_commit_message(message.clone());
        }
        builder.build()
    }

    fn create_request(&self) -> Option<CreateRequest> {
        self.create.then(|| CreateRequest {
            description: self.description.clone(),
            private: self.private,
        })
    }

    /// Execute the upload command
    pub async fn execute(&self, ctx: &CommandContext) -> Result<ExitStatus> {
        let formatter = ctx.formatter();

        // Step 1: Configuration
        let config = self.effective_config(ctx.load_config()?);
        ensure_valid(&config)?;
        let branch = BranchName::new(config.sync.branch.clone())?;

        // Step 2: Local root, checked before anything touches GitHub
        ensure_directory(&self.path).await?;

        // Step 3: Credentials
        let session = GitHubSession::connect(ctx.token()?, &config).await?;

        if self.dry_run {
            return self.execute_dry_run(ctx, &session, &config).await;
        }

        // Step 4: Repository
        let ensured = EnsureRepositoryUseCase::new(session.host.clone())
            .execute(&self.repo, self.create_request().as_ref())
            .await?;
        let EnsuredRepository { info: repo, created } = ensured;
        if let Some(notice) = created_notice(ctx.format, &repo, created) {
            formatter.success(&notice);
        }

        // Step 5: Batch
        let reconciler = session.reconciler(&repo, &config)?;
        let mut runner = BatchRunner::from_config(reconciler.clone(), &config);
        if let Some(progress) = progress_printer(ctx) {
            runner = runner.with_progress(progress);
        }

        let cancel = CancellationToken::new();
        let ctrl_c = spawn_ctrl_c_handler(cancel.clone());

        formatter.info(&format!(
            "Uploading {} to {} ({})",
            self.path.display(),
            repo.slug,
            branch
        ));
        let report = runner
            .run(&self.path, &branch, &cancel)
            .await
            .context("Upload failed")?;
        ctrl_c.abort();

        // Step 6: README
        let readme = if self.no_readme || report.cancelled {
            None
        } else {
            let outcome = SyncReadmeUseCase::new(reconciler)
                .execute(repo.slug.name(), &self.description, &branch)
                .await?;
            Some(outcome)
        };

        // Step 7: Results
        let readme_failed = readme.as_ref().is_some_and(SyncOutcome::is_failed);
        if ctx.is_json() {
            formatter.print_json(&report_json(&repo, &branch, created, &report, readme.as_ref()));
        } else {
            print_summary(ctx, &repo, &report, readme.as_ref());
        }

        Ok(ExitStatus::for_report(
            &report,
            readme_failed,
            self.fail_on_error,
        ))
    }

    /// Lists what would be uploaded
    ///
    /// The token is checked and the repository looked up, but nothing is
    /// created or written.
    async fn execute_dry_run(
        &self,
        ctx: &CommandContext,
        session: &GitHubSession,
        config: &Config,
    ) -> Result<ExitStatus> {
        use ghupload_core::ports::IRepositoryHost;

        let formatter = ctx.formatter();

        let existing = session
            .host
            .resolve(&self.repo)
            .await
            .with_context(|| format!("Failed to resolve repository {}", self.repo))?;
        let (repo, exists) = match existing {
            Some(info) => (info, true),
            None if self.create => (planned_repository(&self.repo, &session.login, self.private)?, false),
            None => anyhow::bail!("Repository not found: {}", self.repo),
        };

        let runner = BatchRunner::from_config(session.reconciler(&repo, config)?, config);
        let entries = runner.plan(&self.path)?;
        info!(files = entries.len(), "Dry run planned");

        if ctx.is_json() {
            let files: Vec<&str> = entries.iter().map(|e| e.relative_path().as_str()).collect();
            formatter.print_json(&serde_json::json!({
                "dry_run": true,
                "repository": repo.slug.to_string(),
                "repository_exists": exists,
                "branch": config.sync.branch,
                "readme": !self.no_readme,
                "total": entries.len(),
                "files": files,
            }));
        } else {
            formatter.info("Dry run mode - no changes will be made");
            if !exists {
                formatter.info(&format!("Would create repository {}", repo.slug));
            }
            for entry in &entries {
                formatter.info(&format!("  {}", entry.relative_path()));
            }
            if !self.no_readme {
                formatter.info("  README.md (generated)");
            }
            formatter.success(&format!(
                "Would upload {} to {}",
                plural(entries.len(), "file"),
                repo.slug
            ));
        }

        Ok(ExitStatus::Success)
    }
}

/// Fails unless `path` is an existing directory
async fn ensure_directory(path: &Path) -> Result<()> {
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Path not found: {}", path.display()))?;
    anyhow::ensure!(metadata.is_dir(), "Not a directory: {}", path.display());
    Ok(())
}

/// Repository a `--create` run would make
fn planned_repository(slug: &RepoSlug, login: &str, private: bool) -> Result<RepositoryInfo> {
    let slug = RepoSlug::with_owner(login, slug.name())?;
    Ok(RepositoryInfo {
        slug,
        default_branch: ghupload_core::domain::DEFAULT_BRANCH.to_string(),
        private,
        html_url: None,
    })
}

/// Human-mode line announcing a new repository
///
/// JSON output carries `created_repository` in the final report instead, so
/// stdout holds a single document.
fn created_notice(format: OutputFormat, repo: &RepositoryInfo, created: bool) -> Option<String> {
    if !created || matches!(format, OutputFormat::Json) {
        return None;
    }
    Some(format!("Created repository {}", repo.slug))
}

/// Cancels `token` on Ctrl-C; files already in flight still finish
fn spawn_ctrl_c_handler(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing files in flight");
            token.cancel();
        }
    })
}

/// Per-file progress lines for human output
fn progress_printer(ctx: &CommandContext) -> Option<ProgressCallback> {
    if ctx.quiet || matches!(ctx.format, OutputFormat::Json) {
        return None;
    }
    Some(Box::new(|progress: BatchProgress<'_>| {
        println!("{}", progress_line(&progress));
    }))
}

fn progress_line(progress: &BatchProgress<'_>) -> String {
    let mark = match progress.outcome {
        SyncOutcome::Created | SyncOutcome::Updated => "\u{2713}",
        SyncOutcome::Skipped(_) => "-",
        SyncOutcome::Failed(_) => "\u{2717}",
    };
    format!(
        "  [{}] {} {} {}",
        progress.done,
        mark,
        progress.entry.relative_path(),
        progress.outcome
    )
}

fn report_json(
    repo: &RepositoryInfo,
    branch: &BranchName,
    created_repository: bool,
    report: &BatchReport,
    readme: Option<&SyncOutcome>,
) -> serde_json::Value {
    let files: Vec<serde_json::Value> = report
        .outcomes
        .iter()
        .map(|(entry, outcome)| {
            serde_json::json!({
                "path": entry.relative_path().as_str(),
                "outcome": outcome,
            })
        })
        .collect();

    serde_json::json!({
        "repository": repo.slug.to_string(),
        "html_url": repo.html_url,
        "branch": branch.as_str(),
        "created_repository": created_repository,
        "total": report.total,
        "created": report.created,
        "updated": report.updated,
        "skipped": report.skipped,
        "failed": report.failed,
        "cancelled": report.cancelled,
        "duration_ms": report.duration_ms,
        "files": files,
        "readme": readme,
    })
}

fn print_summary(
    ctx: &CommandContext,
    repo: &RepositoryInfo,
    report: &BatchReport,
    readme: Option<&SyncOutcome>,
) {
    let formatter = ctx.formatter();

    if report.cancelled {
        formatter.warn(&format!(
            "Upload cancelled after {}",
            plural(report.total, "file")
        ));
    } else if report.total == 0 {
        formatter.success("Nothing to upload");
    } else {
        formatter.success(&format!(
            "Upload completed in {}",
            format_duration(report.duration_ms)
        ));
    }

    if report.created > 0 {
        formatter.info(&format!("Created: {}", plural(report.created, "file")));
    }
    if report.updated > 0 {
        formatter.info(&format!("Updated: {}", plural(report.updated, "file")));
    }
    if report.skipped > 0 {
        formatter.info(&format!("Skipped: {}", plural(report.skipped, "file")));
    }

    match readme {
        Some(SyncOutcome::Failed(cause)) => {
            formatter.warn(&format!("README.md not written: {}", cause))
        }
        Some(outcome) => formatter.info(&format!("README.md: {}", outcome)),
        None => {}
    }

    if report.has_failures() {
        formatter.error(&format!(
            "{} failed:",
            plural(report.failed, "file")
        ));
        for (entry, cause) in report.failures() {
            formatter.info(&format!("  - {}: {}", entry.relative_path(), cause));
        }
    }

    if let Some(url) = &repo.html_url {
        formatter.info(&format!("Repository: {}", url));
    }
}
