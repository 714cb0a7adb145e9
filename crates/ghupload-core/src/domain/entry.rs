//! Local file entries produced by tree enumeration

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::newtypes::RelativePath;

/// A regular file found below the sync root
///
/// `relative_path` is the key used against the remote store; the absolute
/// path is only used to read the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalFileEntry {
    absolute_path: PathBuf,
    relative_path: RelativePath,
}

impl LocalFileEntry {
    /// Create a new entry
    #[must_use]
    pub fn new(absolute_path: PathBuf, relative_path: RelativePath) -> Self {
        Self {
            absolute_path,
            relative_path,
        }
    }

    /// Absolute path on the local filesystem
    #[must_use]
    pub fn absolute_path(&self) -> &Path {
        &self.absolute_path
    }

    /// Path relative to the sync root, `/`-separated
    #[must_use]
    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }
}
