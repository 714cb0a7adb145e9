//! Remote store port (driven/secondary port)
//!
//! This module defines the interface the reconciliation engine requires from
//! the hosted repository: a path-scoped existence check plus create and
//! update primitives, each scoped to a branch.
//!
//! ## Design Notes
//!
//! - Unlike the other ports this one does not use `anyhow::Result`. The
//!   reconciliation engine branches on the error kind, so errors are a
//!   tagged [`RemoteError`] and "not found" is `Ok(None)`, never an error.
//! - Uses `#[async_trait]` for async trait methods.

use thiserror::Error;

use crate::domain::newtypes::{BranchName, ContentVersion, RelativePath};
use crate::domain::outcome::FailureKind;

/// Current state of a path on a branch of the remote store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObjectRef {
    /// Path of the object, relative to the repository root
    pub path: RelativePath,
    /// Version token of the current content (blob SHA for GitHub)
    pub version: ContentVersion,
}

/// Errors returned by remote store operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The remote object changed since the expected version was observed,
    /// or appeared after it was observed as absent
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Network failure, timeout, rate limiting, or server-side error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Authentication failed or the token lacks the required scope
    #[error("Permission denied: {0}")]
    Permission(String),

    /// Any other refusal by the remote store
    #[error("Rejected ({status}): {message}")]
    Rejected {
        /// HTTP status returned by the store
        status: u16,
        /// Message returned by the store
        message: String,
    },
}

impl RemoteError {
    /// Maps this error onto the per-file failure classification
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            RemoteError::Conflict(_) => FailureKind::Conflict,
            RemoteError::Transport(_) => FailureKind::Transport,
            RemoteError::Permission(_) => FailureKind::Permission,
            RemoteError::Rejected { .. } => FailureKind::Rejected,
        }
    }
}

/// Port trait for per-path remote store operations
///
/// ## Implementation Notes
///
/// - `exists` must return `Ok(None)` only when the path is genuinely absent
///   on the branch. Network, permission and other failures must be errors.
/// - `update` must be conditional on `expected`: when the remote version no
///   longer matches, return [`RemoteError::Conflict`] instead of overwriting.
/// - Implementations must be safe to call concurrently.
#[async_trait::async_trait]
pub trait IRemoteStore: Send + Sync {
    /// Looks up the current version of `path` on `branch`
    async fn exists(
        &self,
        path: &RelativePath,
        branch: &BranchName,
    ) -> Result<Option<RemoteObjectRef>, RemoteError>;

    /// Creates `path` on `branch` with the given content
    async fn create(
        &self,
        path: &RelativePath,
        content: &[u8],
        message: &str,
        branch: &BranchName,
    ) -> Result<(), RemoteError>;

    /// Replaces the content of `path` on `branch`, provided its current
    /// version is still `expected`
    async fn update(
        &self,
        path: &RelativePath,
        content: &[u8],
        message: &str,
        expected: &ContentVersion,
        branch: &BranchName,
    ) -> Result<(), RemoteError>;
}
