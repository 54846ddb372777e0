use quiz_core::model::{QuizId, SessionRecord};
use tracing::debug;

use super::SqliteRepository;
use super::mapping::{id_to_i64, map_session_row, write_error};
use crate::repository::{SessionHistoryProvider, SessionRecorder, StorageError};

#[async_trait::async_trait]
impl SessionRecorder for SqliteRepository {
    async fn append_session(&self, session: &SessionRecord) -> Result<(), StorageError> {
        let topic_breakdown = session
            .topic_breakdown()
            .encode()
            .map_err(StorageError::Serialization)?;

        sqlx::query(
            r"
                INSERT INTO sessions (
                    id, quiz_id, occurred_at, total_questions, correct_count,
                    incorrect_count, average_response_seconds, topic_breakdown
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
        )
        .bind(session.id().to_string())
        .bind(id_to_i64("quiz_id", session.quiz_id().value())?)
        .bind(session.timestamp())
        .bind(i64::from(session.total_questions()))
        .bind(i64::from(session.correct_count()))
        .bind(i64::from(session.incorrect_count()))
        .bind(session.average_response_seconds())
        .bind(topic_breakdown)
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        debug!(session_id = %session.id(), quiz_id = %session.quiz_id(), "session appended");
        Ok(())
    }
}

#[async_trait::async_trait]
impl SessionHistoryProvider for SqliteRepository {
    async fn list_sessions(&self, quiz_id: Option<QuizId>) -> Result<Vec<SessionRecord>, StorageError> {
        let mut sql = String::from(
            r"
                SELECT
                    id, quiz_id, occurred_at, total_questions, correct_count,
                    incorrect_count, average_response_seconds, topic_breakdown
                FROM sessions
            ",
        );
        if quiz_id.is_some() {
            sql.push_str(" WHERE quiz_id = ?1");
        }
        sql.push_str(" ORDER BY occurred_at ASC, rowid ASC");

        let mut query = sqlx::query(&sql);
        if let Some(id) = quiz_id {
            query = query.bind(id_to_i64("quiz_id", id.value())?);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_session_row(&row)?);
        }
        // Text ordering breaks down when sub-second precision varies between rows.
        out.sort_by_key(SessionRecord::timestamp);
        Ok(out)
    }
}
