//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::AttemptError;
use exam_core::{CatalogError, ConfigError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by exam session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session has not completed yet")]
    NotCompleted,
    #[error("session result was already handed off")]
    AlreadyHandedOff,
    #[error("session runner has stopped")]
    RunnerClosed,
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
