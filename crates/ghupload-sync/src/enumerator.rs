//! Local tree enumeration
//!
//! [`TreeEnumerator`] walks an upload root depth-first in file-name order and
//! yields one [`LocalFileEntry`] per regular file that survives the
//! [`PathFilter`]. Excluded directories are pruned without being read.
//! Anything that is not a regular file, or cannot be read, is logged and
//! skipped; the walk itself never fails once the root has been validated.

use std::path::{Path, PathBuf};

use ghupload_core::domain::newtypes::RelativePath;
use ghupload_core::domain::LocalFileEntry;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::filter::PathFilter;
use crate::SyncError;

/// Counters collected during one walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnumerationStats {
    /// Regular files handed to the caller
    pub yielded: usize,
    /// Files dropped and directories pruned by the filter
    pub excluded: usize,
    /// Symlinks, special files and unreadable entries
    pub skipped: usize,
}

/// Restartable enumerator over an upload root
#[derive(Debug, Clone)]
pub struct TreeEnumerator {
    root: PathBuf,
    filter: PathFilter,
}

impl TreeEnumerator {
    /// Creates an enumerator after checking that `root` is a directory
    ///
    /// # Errors
    ///
    /// [`SyncError::RootNotFound`] or [`SyncError::RootNotDirectory`] when
    /// the root is unusable.
    pub fn new(root: impl Into<PathBuf>, filter: PathFilter) -> Result<Self, SyncError> {
        let root = root.into();
        let metadata = match std::fs::metadata(&root) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SyncError::RootNotFound(root))
            }
            Err(e) => return Err(SyncError::IoError(e)),
        };
        if !metadata.is_dir() {
            return Err(SyncError::RootNotDirectory(root));
        }

        Ok(Self { root, filter })
    }

    /// Starts a fresh walk. Each call re-reads the filesystem.
    pub fn entries(&self) -> Entries<'_> {
        Entries {
            root: &self.root,
            filter: &self.filter,
            walker: WalkDir::new(&self.root)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter(),
            stats: EnumerationStats::default(),
            finished: false,
        }
    }
}

/// Lazy iterator returned by [`TreeEnumerator::entries`]
pub struct Entries<'a> {
    root: &'a Path,
    filter: &'a PathFilter,
    walker: walkdir::IntoIter,
    stats: EnumerationStats,
    finished: bool,
}

impl Entries<'_> {
    /// Counters so far; final once the iterator returned `None`
    pub fn stats(&self) -> EnumerationStats {
        self.stats
    }
}

impl Iterator for Entries<'_> {
    type Item = LocalFileEntry;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next() {
                Some(Ok(entry)) => entry,
                Some(Err(err)) => {
                    warn!(
                        path = ?err.path(),
                        error = %err,
                        "Skipping unreadable entry"
                    );
                    self.stats.skipped += 1;
                    continue;
                }
                None => {
                    if !self.finished {
                        self.finished = true;
                        info!(
                            root = %self.root.display(),
                            files = self.stats.yielded,
                            excluded = self.stats.excluded,
                            skipped = self.stats.skipped,
                            "Enumeration complete"
                        );
                    }
                    return None;
                }
            };

            if entry.depth() == 0 {
                continue;
            }

            let file_type = entry.file_type();

            if file_type.is_dir() {
                let name = entry.file_name().to_string_lossy();
                if self.filter.is_excluded_dir(&name) {
                    debug!(path = %entry.path().display(), "Pruning excluded directory");
                    self.stats.excluded += 1;
                    self.walker.skip_current_dir();
                }
                continue;
            }

            if file_type.is_symlink() {
                warn!(path = %entry.path().display(), "Skipping symbolic link");
                self.stats.skipped += 1;
                continue;
            }

            if !file_type.is_file() {
                warn!(path = %entry.path().display(), "Skipping special file");
                self.stats.skipped += 1;
                continue;
            }

            let relative = match RelativePath::from_root(self.root, entry.path()) {
                Ok(relative) => relative,
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "Skipping unrepresentable path");
                    self.stats.skipped += 1;
                    continue;
                }
            };

            if self.filter.is_excluded(relative.as_str()) {
                debug!(path = %relative, "Excluded by filter");
                self.stats.excluded += 1;
                continue;
            }

            self.stats.yielded += 1;
            return Some(LocalFileEntry::new(entry.into_path(), relative));
        }
    }
}
