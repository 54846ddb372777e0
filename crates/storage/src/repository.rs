use async_trait::async_trait;
use quiz_core::model::{Question, QuestionId, Quiz, QuizId, SessionId, SessionRecord};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Read side of the session history.
///
/// Every call returns a complete snapshot ordered by session timestamp, oldest
/// first. Sessions recorded concurrently either appear in full or not at all.
#[async_trait]
pub trait SessionHistoryProvider: Send + Sync {
    /// List sessions, optionally restricted to one quiz.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the history cannot be read.
    async fn list_sessions(&self, quiz_id: Option<QuizId>) -> Result<Vec<SessionRecord>, StorageError>;
}

/// Write side of the session history. Sessions are append-only.
#[async_trait]
pub trait SessionRecorder: Send + Sync {
    /// Persist a finished session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if a session with the same ID exists,
    /// `StorageError::NotFound` if its quiz does not exist, or other storage errors.
    async fn append_session(&self, session: &SessionRecord) -> Result<(), StorageError>;
}

/// Repository contract for quizzes and their questions.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Persist or update a quiz.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the quiz cannot be stored.
    async fn upsert_quiz(&self, quiz: &Quiz) -> Result<(), StorageError>;

    /// Fetch a quiz by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_quiz(&self, id: QuizId) -> Result<Quiz, StorageError>;

    /// List all quizzes ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the quizzes cannot be read.
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StorageError>;

    /// Persist or update a question.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the question's quiz does not exist,
    /// or other storage errors.
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError>;

    /// List the questions of a quiz ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the questions cannot be read.
    async fn list_questions(&self, quiz_id: QuizId) -> Result<Vec<Question>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    quizzes: Arc<Mutex<HashMap<QuizId, Quiz>>>,
    questions: Arc<Mutex<HashMap<QuestionId, Question>>>,
    sessions: Arc<Mutex<Vec<SessionRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn quiz_exists(&self, id: QuizId) -> Result<bool, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.contains_key(&id))
    }
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn upsert_quiz(&self, quiz: &Quiz) -> Result<(), StorageError> {
        let mut guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(quiz.id(), quiz.clone());
        Ok(())
    }

    async fn get_quiz(&self, id: QuizId) -> Result<Quiz, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut quizzes: Vec<Quiz> = guard.values().cloned().collect();
        quizzes.sort_by_key(Quiz::id);
        Ok(quizzes)
    }

    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError> {
        if !self.quiz_exists(question.quiz_id())? {
            return Err(StorageError::NotFound);
        }
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(question.id(), question.clone());
        Ok(())
    }

    async fn list_questions(&self, quiz_id: QuizId) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut questions: Vec<Question> = guard
            .values()
            .filter(|q| q.quiz_id() == quiz_id)
            .cloned()
            .collect();
        questions.sort_by_key(Question::id);
        Ok(questions)
    }
}

#[async_trait]
impl SessionRecorder for InMemoryRepository {
    async fn append_session(&self, session: &SessionRecord) -> Result<(), StorageError> {
        if !self.quiz_exists(session.quiz_id())? {
            return Err(StorageError::NotFound);
        }
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.iter().any(|s| s.id() == session.id()) {
            return Err(StorageError::Conflict);
        }
        guard.push(session.clone());
        Ok(())
    }
}

#[async_trait]
impl SessionHistoryProvider for InMemoryRepository {
    async fn list_sessions(&self, quiz_id: Option<QuizId>) -> Result<Vec<SessionRecord>, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut sessions: Vec<SessionRecord> = guard
            .iter()
            .filter(|s| quiz_id.is_none_or(|id| s.quiz_id() == id))
            .cloned()
            .collect();
        sessions.sort_by_key(SessionRecord::timestamp);
        Ok(sessions)
    }
}

/// Parse a stored session identifier.
pub(crate) fn parse_session_id(raw: &str) -> Result<SessionId, StorageError> {
    raw.parse()
        .map_err(|_| StorageError::Serialization(format!("invalid session id: {raw}")))
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizRepository>,
    pub history: Arc<dyn SessionHistoryProvider>,
    pub recorder: Arc<dyn SessionRecorder>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let quizzes: Arc<dyn QuizRepository> = Arc::new(repo.clone());
        let history: Arc<dyn SessionHistoryProvider> = Arc::new(repo.clone());
        let recorder: Arc<dyn SessionRecorder> = Arc::new(repo);
        Self {
            quizzes,
            history,
            recorder,
        }
    }
}
