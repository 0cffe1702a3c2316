//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use quiz_core::Overlay;
use quiz_core::model::{QuestionBankError, TransitionError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Reasons a quiz operation was ignored.
///
/// None of these change session state; callers are free to discard them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz input is suspended ({0:?})")]
    Suspended(Overlay),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Errors emitted while loading a question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankLoadError {
    #[error("failed to read question bank {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Invalid(#[from] QuestionBankError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Bank(#[from] BankLoadError),
}
