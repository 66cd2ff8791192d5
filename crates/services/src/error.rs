//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use quiz_core::SessionError;
use quiz_core::model::{QuizError, QuizId};
use storage::StorageError;

/// Errors from the record store boundary.
///
/// Always recoverable: callers report them and keep going.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    /// Configuration missing or the client could not be built.
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    /// A specific insert or list call failed.
    #[error("record store operation failed: {0}")]
    OperationFailed(String),
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        StoreError::OperationFailed(err.to_string())
    }
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error("unknown quiz: {0}")]
    UnknownQuiz(QuizId),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors emitted while loading a quiz catalog.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] QuizError),
}

/// Errors emitted while reading store settings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreConfigError {
    #[error("unknown store backend: {0} (expected memory, sqlite or rest)")]
    UnknownBackend(String),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
