use chrono::{DateTime, Utc};
use quiz_core::model::{
    Question, QuestionDraft, QuestionId, Quiz, QuizId, SessionRecord, SessionRecordDraft,
    TopicBreakdown,
};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::{StorageError, parse_session_id};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Map a write failure, turning constraint violations into domain errors.
pub(crate) fn write_error(e: sqlx::Error) -> StorageError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return StorageError::Conflict;
        }
        if db.is_foreign_key_violation() {
            return StorageError::NotFound;
        }
    }
    StorageError::Connection(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn id_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn quiz_id_from_i64(v: i64) -> Result<QuizId, StorageError> {
    Ok(QuizId::new(i64_to_u64("quiz_id", v)?))
}

pub(crate) fn question_id_from_i64(v: i64) -> Result<QuestionId, StorageError> {
    Ok(QuestionId::new(i64_to_u64("question_id", v)?))
}

pub(crate) fn map_quiz_row(row: &SqliteRow) -> Result<Quiz, StorageError> {
    Quiz::new(
        quiz_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        row.try_get::<String, _>("name").map_err(ser)?,
        row.try_get::<Option<String>, _>("description").map_err(ser)?,
        row.try_get("created_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_question_row(row: &SqliteRow) -> Result<Question, StorageError> {
    let alternatives: Vec<String> =
        serde_json::from_str(&row.try_get::<String, _>("alternatives").map_err(ser)?).map_err(ser)?;
    let difficulty_i64: i64 = row.try_get("difficulty").map_err(ser)?;
    let difficulty = u8::try_from(difficulty_i64)
        .map_err(|_| StorageError::Serialization(format!("invalid difficulty: {difficulty_i64}")))?;

    let mut draft = QuestionDraft::new(
        quiz_id_from_i64(row.try_get::<i64, _>("quiz_id").map_err(ser)?)?,
        row.try_get::<String, _>("topic").map_err(ser)?,
        row.try_get::<String, _>("prompt").map_err(ser)?,
        alternatives,
        row.try_get::<String, _>("correct_answer").map_err(ser)?,
    )
    .with_difficulty(difficulty);
    if let Some(explanation) = row.try_get::<Option<String>, _>("explanation").map_err(ser)? {
        draft = draft.with_explanation(explanation);
    }

    draft
        .validate(question_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?)
        .map_err(ser)
}

/// Map a session row. The topic breakdown is left encoded so a corrupt
/// payload only affects that session's topic contributions.
pub(crate) fn map_session_row(row: &SqliteRow) -> Result<SessionRecord, StorageError> {
    let id_text: String = row.try_get("id").map_err(ser)?;
    let timestamp: DateTime<Utc> = row.try_get("occurred_at").map_err(ser)?;

    SessionRecordDraft {
        id: parse_session_id(&id_text)?,
        quiz_id: quiz_id_from_i64(row.try_get::<i64, _>("quiz_id").map_err(ser)?)?,
        timestamp,
        total_questions: u32_from_i64(
            "total_questions",
            row.try_get::<i64, _>("total_questions").map_err(ser)?,
        )?,
        correct_count: u32_from_i64(
            "correct_count",
            row.try_get::<i64, _>("correct_count").map_err(ser)?,
        )?,
        incorrect_count: u32_from_i64(
            "incorrect_count",
            row.try_get::<i64, _>("incorrect_count").map_err(ser)?,
        )?,
        average_response_seconds: row.try_get("average_response_seconds").map_err(ser)?,
        topic_breakdown: TopicBreakdown::Encoded(row.try_get("topic_breakdown").map_err(ser)?),
    }
    .validate()
    .map_err(ser)
}
