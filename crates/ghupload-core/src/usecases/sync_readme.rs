//! README synchronization use case
//!
//! Writes a generated `README.md` to the repository root using the same
//! create-or-update decision as every other file.

use std::sync::Arc;

use tracing::info;

use crate::domain::newtypes::{BranchName, RelativePath};
use crate::domain::{DomainError, SyncOutcome};
use crate::usecases::reconcile_file::ReconcileFileUseCase;

pub const README_PATH: &str = "README.md";

/// Renders the README for `repo_name`
pub fn readme_content(repo_name: &str, description: &str) -> String {
    format!(
        "# {repo_name}\n\n{description}\n\nThis repository was automatically uploaded using GitHub Uploader."
    )
}

/// Use case for creating or refreshing the repository README
pub struct SyncReadmeUseCase {
    reconciler: Arc<ReconcileFileUseCase>,
}

impl SyncReadmeUseCase {
    pub fn new(reconciler: Arc<ReconcileFileUseCase>) -> Self {
        Self { reconciler }
    }

    /// Creates or updates `README.md` on `branch`
    ///
    /// Failures are reported through the outcome, like any other file.
    #[tracing::instrument(skip(self, description))]
    pub async fn execute(
        &self,
        repo_name: &str,
        description: &str,
        branch: &BranchName,
    ) -> Result<SyncOutcome, DomainError> {
        let path = RelativePath::new(README_PATH.to_string())?;
        let content = readme_content(repo_name, description);

        let outcome = self
            .reconciler
            .reconcile_content(&path, content.as_bytes(), branch)
            .await;

        info!(outcome = %outcome, "README synchronized");
        Ok(outcome)
    }
}
