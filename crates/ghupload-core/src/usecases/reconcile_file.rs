//! File reconciliation use case
//!
//! Decides, for a single local file, whether the remote counterpart has to
//! be created or updated, performs exactly one of those calls, and turns
//! every failure into a [`SyncOutcome`] instead of an error so the caller
//! can move on to the next file.

use std::future::Future;
use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::newtypes::{BranchName, RelativePath};
use crate::domain::{FailureKind, LocalFileEntry, SyncOutcome};
use crate::ports::{ILocalSource, IRemoteStore, RemoteError};

/// Default bound for a single remote call
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default size limit for uploaded files: 100 MiB
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Tunables for [`ReconcileFileUseCase`]
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Upper bound for each remote call; elapsed calls fail as transport errors
    pub request_timeout: Duration,
    /// Files larger than this are skipped without contacting the remote store
    pub max_file_size_bytes: u64,
    /// Optional prefix for the generated commit messages
    pub commit_message: Option<String>,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE,
            commit_message: None,
        }
    }
}

/// Use case for reconciling individual files against the remote store
pub struct ReconcileFileUseCase {
    remote_store: Arc<dyn IRemoteStore>,
    local_source: Arc<dyn ILocalSource>,
    options: ReconcileOptions,
}

impl ReconcileFileUseCase {
    /// Creates a new ReconcileFileUseCase
    ///
    /// # Arguments
    ///
    /// * `remote_store` - Remote store queried and mutated per file
    /// * `local_source` - Reads local file content
    /// * `options` - Timeout, size limit and commit message settings
    pub fn new(
        remote_store: Arc<dyn IRemoteStore>,
        local_source: Arc<dyn ILocalSource>,
        options: ReconcileOptions,
    ) -> Self {
        Self {
            remote_store,
            local_source,
            options,
        }
    }

    /// Reconciles one enumerated file
    ///
    /// The content is read completely before any remote call, so a read
    /// failure never leaves a partial write behind.
    #[tracing::instrument(skip(self, entry), fields(path = %entry.relative_path()))]
    pub async fn reconcile(&self, entry: &LocalFileEntry, branch: &BranchName) -> SyncOutcome {
        let content = match self.read_local(entry).await {
            Ok(content) => content,
            Err(outcome) => return outcome,
        };

        self.reconcile_content(entry.relative_path(), &content, branch)
            .await
    }

    /// Reconciles in-memory content against `path`
    ///
    /// This is the create-or-update decision on its own, shared by file
    /// reconciliation and README synchronization.
    pub async fn reconcile_content(
        &self,
        path: &RelativePath,
        content: &[u8],
        branch: &BranchName,
    ) -> SyncOutcome {
        let existing = match self
            .bounded("exists", self.remote_store.exists(path, branch))
            .await
        {
            Ok(existing) => existing,
            Err(err) => return self.failed(path, "look up remote state", err),
        };

        match existing {
            None => {
                let message = self.commit_message("Add", path);
                match self
                    .bounded(
                        "create",
                        self.remote_store.create(path, content, &message, branch),
                    )
                    .await
                {
                    Ok(()) => {
                        info!(path = %path, bytes = content.len(), "Created file");
                        SyncOutcome::Created
                    }
                    Err(err) => self.failed(path, "create", err),
                }
            }
            Some(remote) => {
                debug!(path = %path, version = %remote.version, "Remote file exists");
                let message = self.commit_message("Update", path);
                match self
                    .bounded(
                        "update",
                        self.remote_store.update(
                            path,
                            content,
                            &message,
                            &remote.version,
                            branch,
                        ),
                    )
                    .await
                {
                    Ok(()) => {
                        info!(path = %path, bytes = content.len(), "Updated file");
                        SyncOutcome::Updated
                    }
                    Err(err) => self.failed(path, "update", err),
                }
            }
        }
    }

    async fn read_local(&self, entry: &LocalFileEntry) -> Result<Vec<u8>, SyncOutcome> {
        let path = entry.absolute_path();

        let size = self
            .local_source
            .file_size(path)
            .await
            .map_err(|err| local_read_outcome(entry, err))?;

        self.check_size(entry, size)?;

        let content = self
            .local_source
            .read_file(path)
            .await
            .map_err(|err| local_read_outcome(entry, err))?;

        // the file may have grown between the two calls
        self.check_size(entry, content.len() as u64)?;
        Ok(content)
    }

    fn check_size(&self, entry: &LocalFileEntry, size: u64) -> Result<(), SyncOutcome> {
        if size <= self.options.max_file_size_bytes {
            return Ok(());
        }
        warn!(
            path = %entry.relative_path(),
            size,
            limit = self.options.max_file_size_bytes,
            "Skipping file above size limit"
        );
        Err(SyncOutcome::Skipped(format!(
            "file is {size} bytes, limit is {} bytes",
            self.options.max_file_size_bytes
        )))
    }

    async fn bounded<T>(
        &self,
        operation: &str,
        call: impl Future<Output = Result<T, RemoteError>>,
    ) -> Result<T, RemoteError> {
        match tokio::time::timeout(self.options.request_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(RemoteError::Transport(format!(
                "{operation} timed out after {}s",
                self.options.request_timeout.as_secs_f64()
            ))),
        }
    }

    fn failed(&self, path: &RelativePath, action: &str, err: RemoteError) -> SyncOutcome {
        if matches!(err, RemoteError::Conflict(_)) {
            warn!(path = %path, error = %err, "Remote changed concurrently, not overwriting");
        } else {
            warn!(path = %path, action, error = %err, "Remote call failed");
        }
        SyncOutcome::failed(err.kind(), err.to_string())
    }

    fn commit_message(&self, action: &str, path: &RelativePath) -> String {
        match self.options.commit_message.as_deref() {
            Some(prefix) if !prefix.trim().is_empty() => format!("{prefix}: {action} {path}"),
            _ => format!("{action} {path}"),
        }
    }
}

fn local_read_outcome(entry: &LocalFileEntry, err: std::io::Error) -> SyncOutcome {
    if err.kind() == ErrorKind::NotFound {
        warn!(path = %entry.relative_path(), "File disappeared before it could be read");
        SyncOutcome::Skipped("file no longer exists".to_string())
    } else {
        warn!(path = %entry.relative_path(), error = %err, "Failed to read local file");
        SyncOutcome::failed(FailureKind::LocalIo, err.to_string())
    }
}
