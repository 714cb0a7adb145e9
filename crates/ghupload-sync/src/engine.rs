//! Batch reconciliation engine
//!
//! The [`BatchRunner`] drives [`ReconcileFileUseCase`] over every entry the
//! [`TreeEnumerator`] yields and aggregates the outcomes into a
//! [`BatchReport`].
//!
//! ## Run Flow
//!
//! 1. **Preconditions**: the root must be an existing directory, otherwise
//!    the run fails before any entry is processed
//! 2. **Dispatch**: entries are reconciled in enumeration order, up to
//!    `concurrency` at a time; a per-entry failure never stops the batch
//! 3. **Aggregation**: outcomes are recorded in enumeration order, whatever
//!    order they completed in
//!
//! ## Cancellation
//!
//! Once the [`CancellationToken`] fires no further entries are dispatched.
//! Calls already in flight complete and are recorded, and the report is
//! marked as cancelled.
//!
//! ## Enumeration
//!
//! The directory walk is blocking I/O, so it runs on tokio's blocking pool
//! and hands entries over through a bounded channel. The walk stops as soon
//! as the run stops consuming.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures_util::{future, stream, StreamExt};
use ghupload_core::config::{Config, MAX_CONCURRENCY};
use ghupload_core::domain::newtypes::BranchName;
use ghupload_core::domain::{BatchReport, LocalFileEntry, SyncOutcome};
use ghupload_core::usecases::ReconcileFileUseCase;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::enumerator::TreeEnumerator;
use crate::filter::PathFilter;
use crate::SyncError;

/// Entries the walker may run ahead of dispatch
const ENUMERATION_BUFFER: usize = 64;

// ============================================================================
// Progress reporting
// ============================================================================

/// Progress notification emitted after each recorded outcome
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress<'a> {
    /// Entries recorded so far, including this one
    pub done: usize,
    pub entry: &'a LocalFileEntry,
    pub outcome: &'a SyncOutcome,
}

/// Callback invoked with every [`BatchProgress`]
pub type ProgressCallback = Box<dyn Fn(BatchProgress<'_>) + Send + Sync>;

// ============================================================================
// BatchRunner
// ============================================================================

/// Runs reconciliation over a whole local tree
pub struct BatchRunner {
    reconciler: Arc<ReconcileFileUseCase>,
    filter: PathFilter,
    concurrency: usize,
    progress: Option<ProgressCallback>,
}

impl BatchRunner {
    /// Creates a sequential runner
    pub fn new(reconciler: Arc<ReconcileFileUseCase>, filter: PathFilter) -> Self {
        Self {
            reconciler,
            filter,
            concurrency: 1,
            progress: None,
        }
    }

    /// Creates a runner using the exclusion and concurrency settings of `config`
    pub fn from_config(reconciler: Arc<ReconcileFileUseCase>, config: &Config) -> Self {
        Self::new(reconciler, PathFilter::from_config(&config.exclusions))
            .with_concurrency(config.sync.concurrency)
    }

    /// Sets the number of entries reconciled at once, clamped to `1..=16`
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, MAX_CONCURRENCY);
        self
    }

    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Lists the entries a run would process, without contacting the remote
    pub fn plan(&self, root: &Path) -> Result<Vec<LocalFileEntry>, SyncError> {
        let enumerator = TreeEnumerator::new(root, self.filter.clone())?;
        let entries = enumerator.entries().collect();
        Ok(entries)
    }

    /// Reconciles every non-excluded file below `root` onto `branch`
    ///
    /// # Errors
    ///
    /// Only precondition failures are errors. Per-entry failures end up in
    /// the report as [`SyncOutcome::Failed`].
    #[tracing::instrument(skip(self, cancel), fields(root = %root.display(), branch = %branch))]
    pub async fn run(
        &self,
        root: &Path,
        branch: &BranchName,
        cancel: &CancellationToken,
    ) -> Result<BatchReport, SyncError> {
        let enumerator = TreeEnumerator::new(root, self.filter.clone())?;

        let started = Instant::now();
        let mut report = BatchReport::new(Utc::now());
        let stopped_early = AtomicBool::new(false);

        info!(concurrency = self.concurrency, "Starting batch");

        let (tx, rx) = mpsc::channel(ENUMERATION_BUFFER);
        let span = tracing::Span::current();
        let walker = tokio::task::spawn_blocking(move || {
            span.in_scope(|| {
                for entry in enumerator.entries() {
                    if tx.blocking_send(entry).is_err() {
                        debug!("Run stopped consuming, ending walk");
                        break;
                    }
                }
            })
        });
        let entries = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|entry| (entry, rx))
        });

        let reconciler = &self.reconciler;
        let mut outcomes = Box::pin(
            entries
                .take_while(|entry| {
                    let go = !cancel.is_cancelled();
                    if !go {
                        debug!(path = %entry.relative_path(), "Cancelled before dispatch");
                        stopped_early.store(true, Ordering::SeqCst);
                    }
                    future::ready(go)
                })
                .map(|entry| async move {
                    let outcome = reconciler.reconcile(&entry, branch).await;
                    (entry, outcome)
                })
                .buffered(self.concurrency),
        );

        while let Some((entry, outcome)) = outcomes.next().await {
            if let Some(progress) = &self.progress {
                progress(BatchProgress {
                    done: report.total + 1,
                    entry: &entry,
                    outcome: &outcome,
                });
            }
            report.record(entry, outcome);
        }
        // closes the channel so a walk cut short by cancellation ends
        drop(outcomes);

        if let Err(err) = walker.await {
            warn!(error = %err, "Directory walk ended abnormally");
        }

        report.cancelled = stopped_early.load(Ordering::SeqCst);
        report.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        if report.cancelled {
            warn!(processed = report.total, "Batch cancelled, remaining files not dispatched");
        }
        info!(
            total = report.total,
            created = report.created,
            updated = report.updated,
            skipped = report.skipped,
            failed = report.failed,
            duration_ms = report.duration_ms,
            "Batch complete"
        );

        Ok(report)
    }
}
