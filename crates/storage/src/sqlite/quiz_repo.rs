use quiz_core::model::{Question, Quiz, QuizId};

use super::SqliteRepository;
use super::mapping::{id_to_i64, map_question_row, map_quiz_row, write_error};
use crate::repository::{QuizRepository, StorageError};

#[async_trait::async_trait]
impl QuizRepository for SqliteRepository {
    async fn upsert_quiz(&self, quiz: &Quiz) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO quizzes (id, name, description, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description
            ",
        )
        .bind(id_to_i64("quiz_id", quiz.id().value())?)
        .bind(quiz.name().to_string())
        .bind(quiz.description().map(ToString::to_string))
        .bind(quiz.created_at())
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(())
    }

    async fn get_quiz(&self, id: QuizId) -> Result<Quiz, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, name, description, created_at
            FROM quizzes WHERE id = ?1
            ",
        )
        .bind(id_to_i64("quiz_id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .ok_or(StorageError::NotFound)?;

        map_quiz_row(&row)
    }

    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, name, description, created_at
            FROM quizzes ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_quiz_row).collect()
    }

    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError> {
        let alternatives = serde_json::to_string(question.alternatives())
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO questions (id, quiz_id, topic, prompt, alternatives, correct_answer, explanation, difficulty)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                quiz_id = excluded.quiz_id,
                topic = excluded.topic,
                prompt = excluded.prompt,
                alternatives = excluded.alternatives,
                correct_answer = excluded.correct_answer,
                explanation = excluded.explanation,
                difficulty = excluded.difficulty
            ",
        )
        .bind(id_to_i64("question_id", question.id().value())?)
        .bind(id_to_i64("quiz_id", question.quiz_id().value())?)
        .bind(question.topic().to_string())
        .bind(question.prompt().to_string())
        .bind(alternatives)
        .bind(question.correct_answer().to_string())
        .bind(question.explanation().map(ToString::to_string))
        .bind(i64::from(question.difficulty()))
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(())
    }

    async fn list_questions(&self, quiz_id: QuizId) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, quiz_id, topic, prompt, alternatives, correct_answer, explanation, difficulty
            FROM questions
            WHERE quiz_id = ?1
            ORDER BY id ASC
            ",
        )
        .bind(id_to_i64("quiz_id", quiz_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_question_row).collect()
    }
}
