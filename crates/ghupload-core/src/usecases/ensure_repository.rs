//! Repository resolution use case
//!
//! Runs before any file is reconciled. The target repository must either
//! exist already or be created here; anything else is a precondition
//! failure that stops the upload.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::newtypes::RepoSlug;
use crate::ports::{IRepositoryHost, NewRepository, RemoteError, RepositoryInfo};

/// Errors that prevent an upload from starting
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Repository not found: {0}")]
    NotFound(String),

    #[error("Failed to resolve repository {slug}: {source}")]
    Resolve {
        slug: String,
        #[source]
        source: RemoteError,
    },

    #[error("Failed to create repository {name}: {source}")]
    Create {
        name: String,
        #[source]
        source: RemoteError,
    },
}

/// What [`EnsureRepositoryUseCase::execute`] should do when the repository
/// is missing
#[derive(Debug, Clone, Default)]
pub struct CreateRequest {
    pub description: String,
    pub private: bool,
}

/// A repository ready to receive files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsuredRepository {
    pub info: RepositoryInfo,
    /// Whether this run created it
    pub created: bool,
}

/// Use case for resolving (and optionally creating) the target repository
pub struct EnsureRepositoryUseCase {
    host: Arc<dyn IRepositoryHost>,
}

impl EnsureRepositoryUseCase {
    pub fn new(host: Arc<dyn IRepositoryHost>) -> Self {
        Self { host }
    }

    /// Resolves `slug`, creating the repository when it is missing and
    /// `create` is given
    #[tracing::instrument(skip(self, create), fields(slug = %slug))]
    pub async fn execute(
        &self,
        slug: &RepoSlug,
        create: Option<&CreateRequest>,
    ) -> Result<EnsuredRepository, RepositoryError> {
        // Step 1: Look for an existing repository
        if let Some(info) = self.resolve(slug).await? {
            if create.is_some() {
                info!(repo = %info.slug, "Repository already exists, uploading into it");
            }
            return Ok(EnsuredRepository {
                info,
                created: false,
            });
        }

        // Step 2: Missing and creation not requested
        let Some(request) = create else {
            return Err(RepositoryError::NotFound(slug.to_string()));
        };

        // Step 3: Create under the authenticated account
        let new_repo = NewRepository {
            name: slug.name().to_string(),
            description: request.description.clone(),
            private: request.private,
        };
        match self.host.create(&new_repo).await {
            Ok(info) => {
                info!(repo = %info.slug, private = info.private, "Created repository");
                Ok(EnsuredRepository {
                    info,
                    created: true,
                })
            }
            Err(RemoteError::Conflict(message)) => {
                // Someone else created it between resolve and create
                warn!(%message, "Repository appeared during creation, resolving again");
                self.resolve(slug)
                    .await?
                    .map(|info| EnsuredRepository {
                        info,
                        created: false,
                    })
                    .ok_or_else(|| RepositoryError::NotFound(slug.to_string()))
            }
            Err(source) => Err(RepositoryError::Create {
                name: new_repo.name,
                source,
            }),
        }
    }

    async fn resolve(&self, slug: &RepoSlug) -> Result<Option<RepositoryInfo>, RepositoryError> {
        self.host
            .resolve(slug)
            .await
            .map_err(|source| RepositoryError::Resolve {
                slug: slug.to_string(),
                source,
            })
    }
}
