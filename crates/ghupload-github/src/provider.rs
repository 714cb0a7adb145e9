//! GitHub implementations of the core ports
//!
//! - [`GitHubRemoteStore`] implements [`IRemoteStore`] on top of the
//!   contents API for one repository
//! - [`GitHubRepositoryHost`] implements [`IRepositoryHost`] on top of the
//!   repository and user endpoints
//!
//! ## Design Notes
//!
//! - HTTP status handling stays in this crate: the ports only ever see
//!   `Ok(None)` for a missing path and a classified [`RemoteError`] otherwise.
//! - The authenticated login is looked up once and cached, since a slug
//!   without owner refers to it.
//! - Every contents write moves the branch head, and GitHub answers 409 to
//!   writes that race on the same branch. Writes through one store are
//!   therefore serialized; existence checks still run concurrently.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OnceCell};
use tracing::instrument;

use ghupload_core::domain::newtypes::{BranchName, ContentVersion, RelativePath, RepoSlug};
use ghupload_core::ports::{
    IRemoteStore, IRepositoryHost, NewRepository, RemoteError, RemoteObjectRef, RepositoryInfo,
};

use crate::client::GitHubClient;
use crate::repos::RepositoryResponse;
use crate::{contents, repos, GitHubError, Operation};

// ============================================================================
// GitHubRemoteStore
// ============================================================================

/// Contents API access scoped to a single repository
pub struct GitHubRemoteStore {
    client: Arc<GitHubClient>,
    owner: String,
    repo: String,
    /// Held for the duration of each PUT
    write_lock: Mutex<()>,
}

impl GitHubRemoteStore {
    /// Creates a store for `owner/repo`
    pub fn new(
        client: Arc<GitHubClient>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            client,
            owner: owner.into(),
            repo: repo.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Creates a store for a resolved repository
    pub fn for_repository(
        client: Arc<GitHubClient>,
        info: &RepositoryInfo,
    ) -> Result<Self, RemoteError> {
        let owner = info.slug.owner().ok_or_else(|| RemoteError::Rejected {
            status: 0,
            message: format!("repository {} has no owner", info.slug),
        })?;
        Ok(Self::new(client, owner, info.slug.name()))
    }
}

#[async_trait]
impl IRemoteStore for GitHubRemoteStore {
    #[instrument(skip(self), fields(path = %path, branch = %branch))]
    async fn exists(
        &self,
        path: &RelativePath,
        branch: &BranchName,
    ) -> Result<Option<RemoteObjectRef>, RemoteError> {
        let metadata = contents::get_content(&self.client, &self.owner, &self.repo, path, branch)
            .await
            .map_err(|e| e.into_remote(Operation::Read))?;

        let Some(metadata) = metadata else {
            return Ok(None);
        };
        let version = ContentVersion::new(metadata.sha).map_err(|e| {
            GitHubError::InvalidResponse(e.to_string()).into_remote(Operation::Read)
        })?;

        Ok(Some(RemoteObjectRef {
            path: path.clone(),
            version,
        }))
    }

    #[instrument(skip(self, content, message), fields(path = %path, bytes = content.len()))]
    async fn create(
        &self,
        path: &RelativePath,
        content: &[u8],
        message: &str,
        branch: &BranchName,
    ) -> Result<(), RemoteError> {
        let _write = self.write_lock.lock().await;
        contents::put_content(
            &self.client,
            &self.owner,
            &self.repo,
            path,
            content,
            message,
            branch,
            None,
        )
        .await
        .map(|_| ())
        .map_err(|e| e.into_remote(Operation::Create))
    }

    #[instrument(skip(self, content, message), fields(path = %path, bytes = content.len()))]
    async fn update(
        &self,
        path: &RelativePath,
        content: &[u8],
        message: &str,
        expected: &ContentVersion,
        branch: &BranchName,
    ) -> Result<(), RemoteError> {
        let _write = self.write_lock.lock().await;
        contents::put_content(
            &self.client,
            &self.owner,
            &self.repo,
            path,
            content,
            message,
            branch,
            Some(expected.as_str()),
        )
        .await
        .map(|_| ())
        .map_err(|e| e.into_remote(Operation::Update))
    }
}

// ============================================================================
// GitHubRepositoryHost
// ============================================================================

/// Repository lookup and creation for the authenticated account
pub struct GitHubRepositoryHost {
    client: Arc<GitHubClient>,
    login: OnceCell<String>,
}

impl GitHubRepositoryHost {
    pub fn new(client: Arc<GitHubClient>) -> Self {
        Self {
            client,
            login: OnceCell::new(),
        }
    }

    /// Login of the account the token belongs to
    ///
    /// Doubles as a credential check: a bad token fails here with
    /// [`RemoteError::Permission`].
    pub async fn authenticated_login(&self) -> Result<&str, RemoteError> {
        let login = self
            .login
            .get_or_try_init(|| async {
                repos::get_authenticated_user(&self.client)
                    .await
                    .map(|user| user.login)
                    .map_err(|e| e.into_remote(Operation::Read))
            })
            .await?;
        Ok(login.as_str())
    }
}

fn to_repository_info(repo: RepositoryResponse) -> Result<RepositoryInfo, RemoteError> {
    let slug = RepoSlug::with_owner(&repo.owner.login, &repo.name).map_err(|e| {
        GitHubError::InvalidResponse(format!("repository {}: {e}", repo.full_name))
            .into_remote(Operation::Read)
    })?;
    Ok(RepositoryInfo {
        slug,
        default_branch: repo.default_branch,
        private: repo.private,
        html_url: repo.html_url,
    })
}

#[async_trait]
impl IRepositoryHost for GitHubRepositoryHost {
    #[instrument(skip(self), fields(slug = %slug))]
    async fn resolve(&self, slug: &RepoSlug) -> Result<Option<RepositoryInfo>, RemoteError> {
        let owner = match slug.owner() {
            Some(owner) => owner.to_string(),
            None => self.authenticated_login().await?.to_string(),
        };

        repos::get_repository(&self.client, &owner, slug.name())
            .await
            .map_err(|e| e.into_remote(Operation::Read))?
            .map(to_repository_info)
            .transpose()
    }

    #[instrument(skip(self, repo), fields(name = %repo.name, private = repo.private))]
    async fn create(&self, repo: &NewRepository) -> Result<RepositoryInfo, RemoteError> {
        let created =
            repos::create_repository(&self.client, &repo.name, &repo.description, repo.private)
                .await
                .map_err(|e| e.into_remote(Operation::Create))?;
        to_repository_info(created)
    }
}
