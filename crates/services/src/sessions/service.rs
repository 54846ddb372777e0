use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use quiz_core::model::{
    Question, QuestionId, QuizId, SessionId, SessionRecord, SessionRecordDraft, TopicStats,
};

use super::progress::SessionProgress;
use crate::error::QuizSessionError;

//
// ─── ANSWER FEEDBACK ───────────────────────────────────────────────────────────
//

/// What the player learns after answering a question.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerFeedback {
    pub question_id: QuestionId,
    pub is_correct: bool,
    pub correct_answer: String,
    pub explanation: Option<String>,
    pub time_spent_seconds: f64,
    /// Correct answers so far, including this one.
    pub current_score: u32,
    pub questions_answered: usize,
    pub total_questions: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct AnsweredQuestion {
    topic: String,
    is_correct: bool,
    time_spent_seconds: f64,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory, timed attempt at a list of questions.
///
/// Questions are presented in order. The session completes once every
/// question is answered, or earlier via `finish`.
pub struct QuizSession {
    id: SessionId,
    quiz_id: QuizId,
    questions: Vec<Question>,
    current: usize,
    answers: Vec<AnsweredQuestion>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    persisted: bool,
}

impl QuizSession {
    /// Create a session over `questions`.
    ///
    /// `started_at` should come from the services layer clock to keep time deterministic.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::Empty` if no questions are provided.
    pub fn new(
        quiz_id: QuizId,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, QuizSessionError> {
        if questions.is_empty() {
            return Err(QuizSessionError::Empty);
        }

        Ok(Self {
            id: SessionId::generate(),
            quiz_id,
            questions,
            current: 0,
            answers: Vec::new(),
            started_at,
            completed_at: None,
            persisted: false,
        })
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        let correct = self.answers.iter().filter(|a| a.is_correct).count();
        u32::try_from(correct).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.questions.len().saturating_sub(self.current)
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total_questions(),
            answered: self.answered_count(),
            remaining: self.remaining(),
            is_complete: self.is_complete(),
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&Question> {
        if self.is_complete() {
            return None;
        }
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    pub(crate) fn is_persisted(&self) -> bool {
        self.persisted
    }

    pub(crate) fn mark_persisted(&mut self) {
        self.persisted = true;
    }

    /// Check `answer` against the current question and advance.
    ///
    /// Answering the last question completes the session at `answered_at`.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::Completed` if no question is left and
    /// `QuizSessionError::InvalidTimeSpent` for a negative or non-finite time.
    pub fn answer_current(
        &mut self,
        answer: &str,
        time_spent_seconds: f64,
        answered_at: DateTime<Utc>,
    ) -> Result<AnswerFeedback, QuizSessionError> {
        if !time_spent_seconds.is_finite() || time_spent_seconds < 0.0 {
            return Err(QuizSessionError::InvalidTimeSpent(time_spent_seconds));
        }
        let (question_id, topic, correct_answer, explanation, is_correct) = {
            let Some(question) = self.current() else {
                return Err(QuizSessionError::Completed);
            };
            (
                question.id(),
                question.topic().to_owned(),
                question.correct_answer().to_owned(),
                question.explanation().map(str::to_owned),
                question.is_correct(answer),
            )
        };

        self.answers.push(AnsweredQuestion {
            topic,
            is_correct,
            time_spent_seconds,
        });
        self.current += 1;
        if self.current >= self.questions.len() {
            self.completed_at = Some(answered_at);
        }

        Ok(AnswerFeedback {
            question_id,
            is_correct,
            correct_answer,
            explanation,
            time_spent_seconds,
            current_score: self.correct_count(),
            questions_answered: self.answers.len(),
            total_questions: self.questions.len(),
        })
    }

    /// Complete the session (if still open) and build its `SessionRecord`.
    ///
    /// The record counts answered questions only. Unanswered questions are
    /// not part of the history.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::NoAnswers` if nothing was answered.
    pub fn finish(&mut self, at: DateTime<Utc>) -> Result<SessionRecord, QuizSessionError> {
        if self.answers.is_empty() {
            return Err(QuizSessionError::NoAnswers);
        }
        let completed_at = *self.completed_at.get_or_insert(at);
        self.build_record(completed_at)
    }

    #[allow(clippy::cast_precision_loss)]
    fn build_record(&self, completed_at: DateTime<Utc>) -> Result<SessionRecord, QuizSessionError> {
        let mut per_topic: BTreeMap<String, (TopicStats, f64)> = BTreeMap::new();
        for answer in &self.answers {
            let (stats, total_time) = per_topic.entry(answer.topic.clone()).or_default();
            if answer.is_correct {
                stats.correct += 1;
            } else {
                stats.incorrect += 1;
            }
            *total_time += answer.time_spent_seconds;
        }

        let topics: BTreeMap<String, TopicStats> = per_topic
            .into_iter()
            .map(|(topic, (mut stats, total_time))| {
                stats.average_response_seconds = total_time / stats.answered() as f64;
                (topic, stats)
            })
            .collect();

        let answered = u32::try_from(self.answers.len()).unwrap_or(u32::MAX);
        let correct = self.correct_count();
        let total_time: f64 = self.answers.iter().map(|a| a.time_spent_seconds).sum();

        let record = SessionRecordDraft {
            id: self.id,
            quiz_id: self.quiz_id,
            timestamp: completed_at,
            total_questions: answered,
            correct_count: correct,
            incorrect_count: answered - correct,
            average_response_seconds: total_time / f64::from(answered),
            topic_breakdown: topics.into(),
        }
        .validate()?;

        Ok(record)
    }
}
