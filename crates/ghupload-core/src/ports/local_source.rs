//! Local source port
//!
//! Reads local file content for reconciliation. Implementations must open,
//! read and close the file within a single call so no handle outlives it.

use std::io;
use std::path::Path;

/// Port trait for reading local files
///
/// Errors are plain [`io::Error`]s so callers can tell a file that vanished
/// after enumeration (`NotFound`) from other read failures.
#[async_trait::async_trait]
pub trait ILocalSource: Send + Sync {
    /// Size of the file in bytes
    async fn file_size(&self, path: &Path) -> io::Result<u64>;

    /// Reads the full file content, binary-safe
    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;
}
