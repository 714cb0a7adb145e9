//! Domain error types
//!
//! Validation failures raised when constructing domain newtypes.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Relative path is empty, absolute, or escapes the sync root
    #[error("Invalid relative path: {0}")]
    InvalidRelativePath(String),

    /// Branch or ref name cannot be used against the remote store
    #[error("Invalid branch name: {0}")]
    InvalidBranch(String),

    /// Repository identifier is not `name` or `owner/name`
    #[error("Invalid repository identifier: {0}")]
    InvalidRepoSlug(String),

    /// Remote content version token is empty
    #[error("Invalid content version: {0}")]
    InvalidContentVersion(String),

    /// Path is not within the directory being synchronized
    #[error("Path not within sync root: {0}")]
    PathNotInSyncRoot(String),
}
