//! Path exclusion rules
//!
//! A relative path is excluded when any of its segments equals an excluded
//! directory name, or when it ends with an excluded suffix. Matching is
//! exact and case-sensitive; there is no glob syntax.

use std::collections::HashSet;

use ghupload_core::config::ExclusionsConfig;

/// Pure predicate over relative paths
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    directories: HashSet<String>,
    suffixes: Vec<String>,
}

impl PathFilter {
    /// Builds a filter from explicit rule sets
    pub fn new<D, S>(directories: D, suffixes: S) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            directories: directories.into_iter().map(Into::into).collect(),
            suffixes: suffixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &ExclusionsConfig) -> Self {
        Self::new(config.directories.clone(), config.suffixes.clone())
    }

    /// Whether `relative_path` must never reach the remote store
    ///
    /// Splits on `/` and `\`, so paths from either separator style match.
    pub fn is_excluded(&self, relative_path: &str) -> bool {
        if relative_path
            .split(['/', '\\'])
            .any(|segment| self.directories.contains(segment))
        {
            return true;
        }

        self.suffixes
            .iter()
            .any(|suffix| relative_path.ends_with(suffix.as_str()))
    }

    /// Whether a directory named `name` is pruned during traversal
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.directories.contains(name)
    }
}
