//! Use cases (interactors) for ghupload
//!
//! Use cases orchestrate domain types through port interfaces. They never
//! talk to HTTP or the filesystem directly.
//!
//! ## Use Cases
//!
//! - [`ReconcileFileUseCase`] - Create-or-update decision for a single file
//! - [`SyncReadmeUseCase`] - Generated `README.md` at the repository root
//! - [`EnsureRepositoryUseCase`] - Resolve or create the target repository

pub mod ensure_repository;
pub mod reconcile_file;
pub mod sync_readme;

pub use ensure_repository::{
    CreateRequest, EnsureRepositoryUseCase, EnsuredRepository, RepositoryError,
};
pub use reconcile_file::{ReconcileFileUseCase, ReconcileOptions};
pub use sync_readme::{readme_content, SyncReadmeUseCase};
