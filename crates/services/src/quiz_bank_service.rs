use std::sync::Arc;

use quiz_core::model::{Question, QuestionDraft, QuestionId, Quiz, QuizId};
use storage::repository::QuizRepository;

use crate::Clock;
use crate::error::QuizBankError;

/// Orchestrates quiz and question creation and persistence.
#[derive(Clone)]
pub struct QuizBankService {
    clock: Clock,
    quizzes: Arc<dyn QuizRepository>,
}

impl QuizBankService {
    #[must_use]
    pub fn new(clock: Clock, quizzes: Arc<dyn QuizRepository>) -> Self {
        Self { clock, quizzes }
    }

    /// Create or replace a quiz.
    ///
    /// Re-saving an existing quiz keeps its creation time.
    ///
    /// # Errors
    ///
    /// Returns `QuizBankError::Quiz` for validation failures.
    /// Returns `QuizBankError::Storage` if persistence fails.
    pub async fn save_quiz(
        &self,
        id: QuizId,
        name: &str,
        description: Option<String>,
    ) -> Result<Quiz, QuizBankError> {
        let created_at = match self.quizzes.get_quiz(id).await {
            Ok(existing) => existing.created_at(),
            Err(storage::repository::StorageError::NotFound) => self.clock.now(),
            Err(e) => return Err(e.into()),
        };
        let quiz = Quiz::new(id, name, description, created_at)?;
        self.quizzes.upsert_quiz(&quiz).await?;
        Ok(quiz)
    }

    /// Validate and store a question under the given ID.
    ///
    /// # Errors
    ///
    /// Returns `QuizBankError::Question` for validation failures.
    /// Returns `QuizBankError::Storage` if the quiz is missing or persistence fails.
    pub async fn add_question(
        &self,
        id: QuestionId,
        draft: QuestionDraft,
    ) -> Result<Question, QuizBankError> {
        let question = draft.validate(id)?;
        self.quizzes.upsert_question(&question).await?;
        Ok(question)
    }

    /// List quizzes ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `QuizBankError::Storage` if repository access fails.
    pub async fn list_quizzes(&self) -> Result<Vec<Quiz>, QuizBankError> {
        Ok(self.quizzes.list_quizzes().await?)
    }

    /// List a quiz's questions ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `QuizBankError::Storage` if repository access fails.
    pub async fn list_questions(&self, quiz_id: QuizId) -> Result<Vec<Question>, QuizBankError> {
        Ok(self.quizzes.list_questions(quiz_id).await?)
    }
}
