//! ghupload Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain types** - `LocalFileEntry`, `SyncOutcome`, `BatchReport`, validated newtypes
//! - **Use cases** - `ReconcileFileUseCase`, `SyncReadmeUseCase`, `EnsureRepositoryUseCase`
//! - **Port definitions** - Traits for adapters: `IRemoteStore`, `IRepositoryHost`, `ILocalSource`
//! - **Configuration** - YAML-backed `Config` with validation and a builder
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no I/O.
//! Ports define trait interfaces that adapter crates implement.
//! Use cases orchestrate domain types through port interfaces.

pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
