//! Local filesystem adapter (secondary/driven adapter)
//!
//! Implements [`ILocalSource`] using `tokio::fs`. Every call opens, reads
//! and closes the file before returning, so no handle is held across a
//! remote call.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use ghupload_core::ports::ILocalSource;
use tracing::{debug, instrument};

/// Adapter that bridges the [`ILocalSource`] port to the real filesystem.
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystemAdapter;

impl LocalFileSystemAdapter {
    /// Create a new `LocalFileSystemAdapter`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ILocalSource for LocalFileSystemAdapter {
    #[instrument(skip(self), fields(path = %path.display()))]
    async fn file_size(&self, path: &Path) -> io::Result<u64> {
        let metadata = tokio::fs::metadata(path).await?;
        Ok(metadata.len())
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        let content = tokio::fs::read(path).await?;
        debug!(bytes = content.len(), "Read local file");
        Ok(content)
    }
}
