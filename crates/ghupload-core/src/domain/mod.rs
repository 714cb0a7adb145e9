//! Domain entities and business logic
//!
//! This module contains the core domain types for GitHub Uploader:
//! - Newtypes for validated paths, branches, versions and repository identifiers
//! - Local file entries produced by tree enumeration
//! - Per-file outcomes and the batch report
//! - Domain-specific error types

pub mod entry;
pub mod errors;
pub mod newtypes;
pub mod outcome;

// Re-export commonly used types
pub use entry::LocalFileEntry;
pub use errors::DomainError;
pub use newtypes::*;
pub use outcome::{BatchReport, FailureCause, FailureKind, SyncOutcome};
