//! Error types for the broadcast daemon.
//!
//! This module provides the application's error hierarchy. The `AppError` enum
//! serves as the top-level error type for startup and scheduler wiring, while
//! domain-specific errors (`StoreError`, `DeliveryError`) carry the detail the
//! dispatch engine needs to decide how a failure is handled.

pub mod config;
pub mod delivery;
pub mod store;

use thiserror::Error;

use crate::error::{config::ConfigError, store::StoreError};

/// Top-level application error type.
///
/// Aggregates all error types that can surface from startup, the caller API,
/// and the scheduler. Most variants use `#[from]` for automatic conversion, so
/// lower layers can return their own error type and `?` does the rest.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Schedule store error: validation, lookup, or state-transition failure.
    #[error(transparent)]
    StoreErr(#[from] StoreError),

    /// Database operation error from SeaORM.
    ///
    /// Raised directly by startup paths (connect, migrate) that do not go
    /// through the store.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// I/O error, raised while waiting on the shutdown signal.
    #[error(transparent)]
    IoErr(#[from] std::io::Error),
}
