//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for the values that cross
//! the boundary between the local tree and the remote store. Each newtype
//! ensures data validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::path::{Component, Path};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// RelativePath
// ============================================================================

/// A path relative to the sync root, always using `/` as separator
///
/// This is the key used against the remote store. It never starts with a
/// slash, never contains empty, `.` or `..` segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelativePath(String);

impl RelativePath {
    /// Create a new RelativePath
    ///
    /// # Errors
    /// Returns error if the path is empty, absolute, or contains empty,
    /// `.` or `..` segments
    pub fn new(path: String) -> Result<Self, DomainError> {
        if path.is_empty() {
            return Err(DomainError::InvalidRelativePath(
                "Relative path cannot be empty".to_string(),
            ));
        }

        if path.starts_with('/') {
            return Err(DomainError::InvalidRelativePath(format!(
                "Relative path must not start with '/': {path}"
            )));
        }

        if path.contains('\\') {
            return Err(DomainError::InvalidRelativePath(format!(
                "Relative path must use '/' separators: {path}"
            )));
        }

        if path
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(DomainError::InvalidRelativePath(format!(
                "Relative path contains an empty or traversal segment: {path}"
            )));
        }

        Ok(Self(path))
    }

    /// Build a RelativePath from a filesystem path that is already relative
    /// to the sync root, joining its components with `/`
    ///
    /// # Errors
    /// Returns error if the path has non-normal components (root, prefix,
    /// `..`) or a component that is not valid UTF-8
    pub fn from_fs_path(path: &Path) -> Result<Self, DomainError> {
        let mut segments = Vec::new();

        for component in path.components() {
            match component {
                Component::Normal(part) => {
                    let part = part.to_str().ok_or_else(|| {
                        DomainError::InvalidRelativePath(format!(
                            "Path is not valid UTF-8: {}",
                            path.display()
                        ))
                    })?;
                    segments.push(part);
                }
                Component::CurDir => {}
                _ => {
                    return Err(DomainError::InvalidRelativePath(format!(
                        "Path is not relative to the sync root: {}",
                        path.display()
                    )))
                }
            }
        }

        Self::new(segments.join("/"))
    }

    /// Build the RelativePath of `path` with respect to `root`
    ///
    /// # Errors
    /// Returns [`DomainError::PathNotInSyncRoot`] if `path` is not below `root`
    pub fn from_root(root: &Path, path: &Path) -> Result<Self, DomainError> {
        let relative = path
            .strip_prefix(root)
            .map_err(|_| DomainError::PathNotInSyncRoot(path.display().to_string()))?;
        Self::from_fs_path(relative)
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the `/`-separated segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Get the final segment
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl Display for RelativePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RelativePath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for RelativePath {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RelativePath> for String {
    fn from(path: RelativePath) -> Self {
        path.0
    }
}

// ============================================================================
// ContentVersion
// ============================================================================

/// Opaque token identifying the current content of a remote object
///
/// For GitHub this is the blob SHA. The value is compared only for
/// equality; it is never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentVersion(String);

impl ContentVersion {
    /// Create a new ContentVersion
    ///
    /// # Errors
    /// Returns error if the token is empty
    pub fn new(token: String) -> Result<Self, DomainError> {
        if token.trim().is_empty() {
            return Err(DomainError::InvalidContentVersion(
                "Content version cannot be empty".to_string(),
            ));
        }
        Ok(Self(token))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ContentVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ContentVersion {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

// ============================================================================
// BranchName
// ============================================================================

/// Default branch used when none is given
pub const DEFAULT_BRANCH: &str = "main";

/// Name of the branch (or ref) that files are synchronized onto
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new BranchName
    ///
    /// # Errors
    /// Returns error if the name is empty, contains whitespace or `..`,
    /// or starts/ends with `/`
    pub fn new(name: String) -> Result<Self, DomainError> {
        if name.is_empty() {
            return Err(DomainError::InvalidBranch(
                "Branch name cannot be empty".to_string(),
            ));
        }

        if name.chars().any(char::is_whitespace) || name.contains("..") {
            return Err(DomainError::InvalidBranch(format!(
                "Branch name contains whitespace or '..': {name}"
            )));
        }

        if name.starts_with('/') || name.ends_with('/') {
            return Err(DomainError::InvalidBranch(format!(
                "Branch name must not start or end with '/': {name}"
            )));
        }

        Ok(Self(name))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BranchName {
    fn default() -> Self {
        Self(DEFAULT_BRANCH.to_string())
    }
}

impl Display for BranchName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BranchName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for BranchName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchName> for String {
    fn from(branch: BranchName) -> Self {
        branch.0
    }
}

// ============================================================================
// RepoSlug
// ============================================================================

/// Repository identifier: either `name` (owned by the authenticated user)
/// or `owner/name`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    owner: Option<String>,
    name: String,
}

impl RepoSlug {
    /// Parse a repository identifier
    ///
    /// # Errors
    /// Returns error if the identifier has more than one `/` or a component
    /// with characters outside `[A-Za-z0-9._-]`
    pub fn parse(slug: &str) -> Result<Self, DomainError> {
        let mut parts = slug.split('/');
        let (owner, name) = match (parts.next(), parts.next(), parts.next()) {
            (Some(name), None, None) => (None, name),
            (Some(owner), Some(name), None) => (Some(owner), name),
            _ => return Err(DomainError::InvalidRepoSlug(slug.to_string())),
        };

        if let Some(owner) = owner {
            if !is_valid_component(owner) {
                return Err(DomainError::InvalidRepoSlug(slug.to_string()));
            }
        }
        if !is_valid_component(name) || name == "." || name == ".." {
            return Err(DomainError::InvalidRepoSlug(slug.to_string()));
        }

        Ok(Self {
            owner: owner.map(str::to_string),
            name: name.to_string(),
        })
    }

    /// Create a fully qualified slug
    ///
    /// # Errors
    /// Returns error if either component is invalid
    pub fn with_owner(owner: &str, name: &str) -> Result<Self, DomainError> {
        Self::parse(&format!("{owner}/{name}"))
    }

    /// Owner, if one was given
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Repository name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a copy with the owner filled in when missing
    #[must_use]
    pub fn or_owner(&self, owner: &str) -> Self {
        Self {
            owner: Some(self.owner.clone().unwrap_or_else(|| owner.to_string())),
            name: self.name.clone(),
        }
    }
}

fn is_valid_component(component: &str) -> bool {
    !component.is_empty()
        && component
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl Display for RepoSlug {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.owner {
            Some(owner) => write!(f, "{}/{}", owner, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl FromStr for RepoSlug {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
