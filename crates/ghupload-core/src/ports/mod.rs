//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IRemoteStore`] - Per-path existence check, create and update on a branch
//! - [`IRepositoryHost`] - Repository resolution and creation
//! - [`ILocalSource`] - Local file reads

pub mod local_source;
pub mod remote_store;
pub mod repository_host;

pub use local_source::ILocalSource;
pub use remote_store::{IRemoteStore, RemoteError, RemoteObjectRef};
pub use repository_host::{IRepositoryHost, NewRepository, RepositoryInfo};
