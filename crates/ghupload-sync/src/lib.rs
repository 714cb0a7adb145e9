//! ghupload Sync - Local tree enumeration and batch reconciliation
//!
//! Provides:
//! - Exclusion filtering of relative paths
//! - Deterministic, lazy enumeration of a local directory tree
//! - The local file adapter for the core `ILocalSource` port
//! - The batch runner driving per-file reconciliation
//!
//! ## Modules
//!
//! - [`filter`] - Directory-segment and suffix exclusion rules
//! - [`enumerator`] - Sorted depth-first walk producing `LocalFileEntry` values
//! - [`filesystem`] - `tokio::fs` backed local source
//! - [`engine`] - Batch runner with bounded concurrency and cancellation

pub mod engine;
pub mod enumerator;
pub mod filesystem;
pub mod filter;

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a batch before any file is processed
#[derive(Debug, Error)]
pub enum SyncError {
    /// The upload root does not exist
    #[error("Path not found: {0}")]
    RootNotFound(PathBuf),

    /// The upload root exists but is not a directory
    #[error("Not a directory: {0}")]
    RootNotDirectory(PathBuf),

    /// An I/O error occurred while inspecting the upload root
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A domain-level error propagated from ghupload-core
    #[error("Domain error: {0}")]
    DomainError(#[from] ghupload_core::domain::errors::DomainError),
}
