//! Readme command - Create or refresh README.md without uploading files

use anyhow::Result;
use clap::Args;

use ghupload_core::config::ConfigBuilder;
use ghupload_core::domain::newtypes::{BranchName, RepoSlug};
use ghupload_core::domain::SyncOutcome;
use ghupload_core::usecases::{EnsureRepositoryUseCase, SyncReadmeUseCase};

use super::{ensure_valid, CommandContext, ExitStatus, GitHubSession};

#[derive(Debug, Args)]
pub struct ReadmeCommand {
    /// Target repository, `owner/name` or a name owned by the token's account
    #[arg(long)]
    pub repo: RepoSlug,

    /// Branch to write to [default: sync.branch from config, "main"]
    #[arg(long)]
    pub branch: Option<String>,

    /// Description written below the title
    #[arg(long, default_value = "")]
    pub description: String,
}

impl ReadmeCommand {
    /// Execute the readme command
    ///
    /// The repository must exist. A failed write exits with status 2.
    pub async fn execute(&self, ctx: &CommandContext) -> Result<ExitStatus> {
        let formatter = ctx.formatter();

        let mut builder = ConfigBuilder::from_config(ctx.load_config()?);
        if let Some(branch) = &self.branch {
            builder = builder.sync_branch(branch.clone());
        }
        let config = builder.build();
        ensure_valid(&config)?;
        let branch = BranchName::new(config.sync.branch.clone())?;

        let session = GitHubSession::connect(ctx.token()?, &config).await?;
        let repo = EnsureRepositoryUseCase::new(session.host.clone())
            .execute(&self.repo, None)
            .await?
            .info;

        let reconciler = session.reconciler(&repo, &config)?;
        let outcome = SyncReadmeUseCase::new(reconciler)
            .execute(repo.slug.name(), &self.description, &branch)
            .await?;

        if ctx.is_json() {
            formatter.print_json(&serde_json::json!({
                "repository": repo.slug.to_string(),
                "branch": branch.as_str(),
                "readme": outcome,
            }));
        } else {
            match &outcome {
                SyncOutcome::Failed(cause) => {
                    formatter.error(&format!("README.md not written: {}", cause))
                }
                outcome => formatter.success(&format!("README.md {} in {}", outcome, repo.slug)),
            }
        }

        Ok(if outcome.is_failed() {
            ExitStatus::FileFailures
        } else {
            ExitStatus::Success
        })
    }
}
