//! Configuration module for ghupload.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::newtypes::{BranchName, DEFAULT_BRANCH};
use crate::usecases::reconcile_file::{ReconcileOptions, DEFAULT_MAX_FILE_SIZE};

/// Upper bound for `sync.concurrency`.
pub const MAX_CONCURRENCY: usize = 16;

/// Directory names excluded by default.
pub const DEFAULT_EXCLUDED_DIRECTORIES: &[&str] =
    &["node_modules", "dist", ".git", "__pycache__", "venv", "env"];

/// File suffixes excluded by default.
pub const DEFAULT_EXCLUDED_SUFFIXES: &[&str] = &[
    ".env",
    "package-lock.json",
    ".pyc",
    ".pyo",
    ".pyd",
    ".so",
    ".dll",
    ".dylib",
    ".log",
    ".tmp",
    ".temp",
    ".DS_Store",
    "Thumbs.db",
];

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for ghupload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sync: SyncConfig,
    pub exclusions: ExclusionsConfig,
    pub github: GitHubConfig,
    pub logging: LoggingConfig,
}

/// Upload settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Target branch for all writes.
    pub branch: String,
    /// Number of files reconciled in parallel (1 = sequential).
    pub concurrency: usize,
    /// Seconds before a single remote call is abandoned.
    pub request_timeout_secs: u64,
    /// Files larger than this are skipped.
    pub max_file_size_bytes: u64,
    /// Optional prefix for generated commit messages.
    pub commit_message: Option<String>,
}

/// Path exclusion rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionsConfig {
    /// A path is excluded when any of its segments equals one of these.
    pub directories: Vec<String>,
    /// A path is excluded when it ends with one of these.
    pub suffixes: Vec<String>,
}

/// GitHub API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub api_base_url: String,
    pub user_agent: String,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/ghupload/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("ghupload")
            .join("config.yaml")
    }

    /// Reconciliation settings derived from the `sync` section.
    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            request_timeout: Duration::from_secs(self.sync.request_timeout_secs),
            max_file_size_bytes: self.sync.max_file_size_bytes,
            commit_message: self.sync.commit_message.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            branch: DEFAULT_BRANCH.to_string(),
            concurrency: 1,
            request_timeout_secs: 30,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE,
            commit_message: None,
        }
    }
}

impl Default for ExclusionsConfig {
    fn default() -> Self {
        Self {
            directories: DEFAULT_EXCLUDED_DIRECTORIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            suffixes: DEFAULT_EXCLUDED_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.github.com".to_string(),
            user_agent: concat!("ghupload/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A single validation problem found in a [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"sync.concurrency"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- sync ---
        if let Err(e) = BranchName::new(self.sync.branch.clone()) {
            errors.push(ValidationError {
                field: "sync.branch".into(),
                message: e.to_string(),
            });
        }
        if self.sync.concurrency == 0 || self.sync.concurrency > MAX_CONCURRENCY {
            errors.push(ValidationError {
                field: "sync.concurrency".into(),
                message: format!("must be in range 1..={MAX_CONCURRENCY}"),
            });
        }
        if self.sync.request_timeout_secs == 0 {
            errors.push(ValidationError {
                field: "sync.request_timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.sync.max_file_size_bytes == 0 {
            errors.push(ValidationError {
                field: "sync.max_file_size_bytes".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- exclusions ---
        if self
            .exclusions
            .directories
            .iter()
            .any(|d| d.is_empty() || d.contains('/') || d.contains('\\'))
        {
            errors.push(ValidationError {
                field: "exclusions.directories".into(),
                message: "entries must be non-empty single path segments".into(),
            });
        }
        if self.exclusions.suffixes.iter().any(String::is_empty) {
            errors.push(ValidationError {
                field: "exclusions.suffixes".into(),
                message: "entries must not be empty".into(),
            });
        }

        // --- github ---
        if !self.github.api_base_url.starts_with("http://")
            && !self.github.api_base_url.starts_with("https://")
        {
            errors.push(ValidationError {
                field: "github.api_base_url".into(),
                message: format!("not an http(s) URL: '{}'", self.github.api_base_url),
            });
        }
        if self.github.user_agent.trim().is_empty() {
            errors.push(ValidationError {
                field: "github.user_agent".into(),
                message: "must not be empty".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use ghupload_core::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .sync_branch("develop")
///     .sync_concurrency(4)
///     .logging_level("debug")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Start from an existing configuration, typically one loaded from disk.
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    // --- sync ---

    pub fn sync_branch(mut self, branch: impl Into<String>) -> Self {
        self.config.sync.branch = branch.into();
        self
    }

    pub fn sync_concurrency(mut self, n: usize) -> Self {
        self.config.sync.concurrency = n;
        self
    }

    pub fn sync_request_timeout_secs(mut self, seconds: u64) -> Self {
        self.config.sync.request_timeout_secs = seconds;
        self
    }

    pub fn sync_max_file_size_bytes(mut self, bytes: u64) -> Self {
        self.config.sync.max_file_size_bytes = bytes;
        self
    }

    pub fn sync_commit_message(mut self, message: impl Into<String>) -> Self {
        self.config.sync.commit_message = Some(message.into());
        self
    }

    // --- exclusions ---

    pub fn exclude_directory(mut self, name: impl Into<String>) -> Self {
        self.config.exclusions.directories.push(name.into());
        self
    }

    pub fn exclude_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.exclusions.suffixes.push(suffix.into());
        self
    }

    // --- github ---

    pub fn github_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.github.api_base_url = url.into();
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
