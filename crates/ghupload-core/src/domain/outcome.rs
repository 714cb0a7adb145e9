//! Per-file outcomes and the batch report
//!
//! A [`SyncOutcome`] is produced for every processed [`LocalFileEntry`].
//! The [`BatchReport`] keeps them in enumeration order together with
//! per-kind counters.

use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::entry::LocalFileEntry;

// ============================================================================
// FailureKind / FailureCause
// ============================================================================

/// Classification of a per-file failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The remote object changed since it was last observed
    Conflict,
    /// Network failure, timeout, or server-side error
    Transport,
    /// Credentials lack the permission for the operation
    Permission,
    /// The remote store refused the request for another reason
    Rejected,
    /// The local file could not be read
    LocalIo,
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::Conflict => "conflict",
            FailureKind::Transport => "transport",
            FailureKind::Permission => "permission",
            FailureKind::Rejected => "rejected",
            FailureKind::LocalIo => "local_io",
        };
        write!(f, "{s}")
    }
}

/// Why a file failed to synchronize
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureCause {
    pub kind: FailureKind,
    pub message: String,
}

impl FailureCause {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl Display for FailureCause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

// ============================================================================
// SyncOutcome
// ============================================================================

/// Result of reconciling a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// The file did not exist remotely and was created
    Created,
    /// The file existed remotely and was updated
    Updated,
    /// No remote call was made
    Skipped(String),
    /// The file could not be synchronized
    Failed(FailureCause),
}

impl SyncOutcome {
    /// Shorthand for a failed outcome
    pub fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failed(FailureCause::new(kind, message))
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, SyncOutcome::Failed(_))
    }

    /// Failure kind, if this outcome is a failure
    #[must_use]
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            SyncOutcome::Failed(cause) => Some(cause.kind),
            _ => None,
        }
    }
}

impl Display for SyncOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SyncOutcome::Created => write!(f, "created"),
            SyncOutcome::Updated => write!(f, "updated"),
            SyncOutcome::Skipped(reason) => write!(f, "skipped ({reason})"),
            SyncOutcome::Failed(cause) => write!(f, "failed ({cause})"),
        }
    }
}

// ============================================================================
// BatchReport
// ============================================================================

/// Summary of one batch run
///
/// Counters always agree with `outcomes`: every call to [`record`](Self::record)
/// bumps `total` and exactly one of the per-kind counters.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Whether dispatch stopped early because of cancellation
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub outcomes: Vec<(LocalFileEntry, SyncOutcome)>,
}

impl BatchReport {
    /// Creates an empty report
    #[must_use]
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            total: 0,
            created: 0,
            updated: 0,
            skipped: 0,
            failed: 0,
            cancelled: false,
            started_at,
            duration_ms: 0,
            outcomes: Vec::new(),
        }
    }

    /// Appends an outcome and updates the counters
    pub fn record(&mut self, entry: LocalFileEntry, outcome: SyncOutcome) {
        self.total += 1;
        match &outcome {
            SyncOutcome::Created => self.created += 1,
            SyncOutcome::Updated => self.updated += 1,
            SyncOutcome::Skipped(_) => self.skipped += 1,
            SyncOutcome::Failed(_) => self.failed += 1,
        }
        self.outcomes.push((entry, outcome));
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Entries whose outcome is `Failed`, in enumeration order
    pub fn failures(&self) -> impl Iterator<Item = (&LocalFileEntry, &FailureCause)> {
        self.outcomes.iter().filter_map(|(entry, outcome)| match outcome {
            SyncOutcome::Failed(cause) => Some((entry, cause)),
            _ => None,
        })
    }

    /// Number of failures of the given kind
    #[must_use]
    pub fn failed_with(&self, kind: FailureKind) -> usize {
        self.failures().filter(|(_, cause)| cause.kind == kind).count()
    }
}
