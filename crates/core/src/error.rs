use thiserror::Error;

use crate::analytics::AnalyticsError;
use crate::model::{MalformedRecordError, QuestionError, QuizError, SessionRecordError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
    #[error(transparent)]
    SessionRecord(#[from] SessionRecordError),
    #[error(transparent)]
    MalformedRecord(#[from] MalformedRecordError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}
