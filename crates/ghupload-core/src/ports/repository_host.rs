//! Repository host port (driven/secondary port)
//!
//! Resolves the target repository before any file is reconciled and
//! optionally creates it. Absence is `Ok(None)`, not an error.

use crate::domain::newtypes::RepoSlug;
use crate::ports::remote_store::RemoteError;

/// A repository that exists on the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    /// Fully qualified `owner/name`
    pub slug: RepoSlug,
    /// Branch the host reports as default
    pub default_branch: String,
    /// Whether the repository is private
    pub private: bool,
    /// Browser URL, when the host provides one
    pub html_url: Option<String>,
}

/// Parameters for creating a repository under the authenticated account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRepository {
    pub name: String,
    pub description: String,
    pub private: bool,
}

/// Port trait for repository-level operations
#[async_trait::async_trait]
pub trait IRepositoryHost: Send + Sync {
    /// Looks up a repository. A slug without owner refers to the
    /// authenticated account.
    async fn resolve(&self, slug: &RepoSlug) -> Result<Option<RepositoryInfo>, RemoteError>;

    /// Creates a repository owned by the authenticated account
    ///
    /// Returns [`RemoteError::Conflict`] when a repository with that name
    /// already exists.
    async fn create(&self, repo: &NewRepository) -> Result<RepositoryInfo, RemoteError>;
}
