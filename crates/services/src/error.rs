//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::analytics::AnalyticsError;
use quiz_core::model::{QuestionError, QuizError, SessionRecordError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by quiz sessions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizSessionError {
    #[error("no questions available for session")]
    Empty,
    #[error("session already completed")]
    Completed,
    #[error("time spent must be finite and non-negative, got {0}")]
    InvalidTimeSpent(f64),
    #[error("cannot finish a session without answers")]
    NoAnswers,
    #[error(transparent)]
    Record(#[from] SessionRecordError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AnalyticsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalyticsServiceError {
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AnalyticsServiceError {
    /// True when the history held nothing to analyse.
    ///
    /// Callers typically show an empty state instead of an error for this case.
    #[must_use]
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::Analytics(AnalyticsError::InsufficientData))
    }
}

/// Errors emitted by `QuizBankService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizBankError {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
