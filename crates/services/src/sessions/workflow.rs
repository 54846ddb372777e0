use std::sync::Arc;

use quiz_core::model::{QuizId, SessionRecord};
use rand::rng;
use rand::seq::SliceRandom;
use storage::repository::{QuizRepository, SessionRecorder};
use tracing::info;

use super::service::{AnswerFeedback, QuizSession};
use crate::Clock;
use crate::error::QuizSessionError;

/// Result of answering a single question in a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionAnswerResult {
    pub feedback: AnswerFeedback,
    pub is_complete: bool,
    /// The persisted record, once the answer completed the session.
    pub record: Option<SessionRecord>,
}

/// Orchestrates session start and persisted answering.
#[derive(Clone)]
pub struct QuizSessionLoop {
    clock: Clock,
    quizzes: Arc<dyn QuizRepository>,
    recorder: Arc<dyn SessionRecorder>,
    shuffle: bool,
}

impl QuizSessionLoop {
    #[must_use]
    pub fn new(
        clock: Clock,
        quizzes: Arc<dyn QuizRepository>,
        recorder: Arc<dyn SessionRecorder>,
    ) -> Self {
        Self {
            clock,
            quizzes,
            recorder,
            shuffle: false,
        }
    }

    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Start a session over the quiz's questions, keeping at most `limit` of them.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::Storage` if the quiz is missing or storage
    /// fails, and `QuizSessionError::Empty` if the quiz has no questions.
    pub async fn start_session(
        &self,
        quiz_id: QuizId,
        limit: Option<usize>,
    ) -> Result<QuizSession, QuizSessionError> {
        self.quizzes.get_quiz(quiz_id).await?;
        let mut questions = self.quizzes.list_questions(quiz_id).await?;

        if self.shuffle {
            let mut rng = rng();
            questions.as_mut_slice().shuffle(&mut rng);
        }
        if let Some(limit) = limit {
            questions.truncate(limit);
        }

        QuizSession::new(quiz_id, questions, self.clock.now())
    }

    /// Answer the current question and persist the session once it completes.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError` for answering or persistence failures.
    pub async fn answer_current(
        &self,
        session: &mut QuizSession,
        answer: &str,
        time_spent_seconds: f64,
    ) -> Result<SessionAnswerResult, QuizSessionError> {
        let feedback = session.answer_current(answer, time_spent_seconds, self.clock.now())?;

        let record = if session.is_complete() && !session.is_persisted() {
            Some(self.persist(session).await?)
        } else {
            None
        };

        Ok(SessionAnswerResult {
            feedback,
            is_complete: session.is_complete(),
            record,
        })
    }

    /// Finish the session early, or retry persistence after a failed append.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::Completed` if the session was already
    /// persisted, `QuizSessionError::NoAnswers` if nothing was answered, or
    /// `QuizSessionError::Storage` if persistence fails.
    pub async fn finish_session(
        &self,
        session: &mut QuizSession,
    ) -> Result<SessionRecord, QuizSessionError> {
        if session.is_persisted() {
            return Err(QuizSessionError::Completed);
        }
        self.persist(session).await
    }

    async fn persist(&self, session: &mut QuizSession) -> Result<SessionRecord, QuizSessionError> {
        let record = session.finish(self.clock.now())?;
        self.recorder.append_session(&record).await?;
        session.mark_persisted();
        info!(
            session_id = %record.id(),
            quiz_id = %record.quiz_id(),
            answered = record.total_questions(),
            correct = record.correct_count(),
            "quiz session recorded"
        );
        Ok(record)
    }
}
