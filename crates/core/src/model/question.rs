use thiserror::Error;

use crate::model::ids::{QuestionId, QuizId};

pub const MIN_ALTERNATIVES: usize = 2;
pub const MAX_ALTERNATIVES: usize = 6;
pub const MAX_TOPIC_CHARS: usize = 255;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("topic cannot be empty")]
    EmptyTopic,

    #[error("topic is too long: {len} characters (max 255)")]
    TopicTooLong { len: usize },

    #[error("question text cannot be empty")]
    EmptyPrompt,

    #[error("expected 2 to 6 alternatives, got {count}")]
    AlternativeCount { count: usize },

    #[error("alternatives cannot be blank")]
    BlankAlternative,

    #[error("correct answer must be one of the alternatives")]
    CorrectAnswerNotListed,

    #[error("difficulty must be between 1 and 5, got {0}")]
    InvalidDifficulty(u8),
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated question input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub quiz_id: QuizId,
    pub topic: String,
    pub prompt: String,
    pub alternatives: Vec<String>,
    pub correct_answer: String,
    pub explanation: Option<String>,
    pub difficulty: u8,
}

impl QuestionDraft {
    /// Build a draft with the default difficulty (1) and no explanation.
    #[must_use]
    pub fn new(
        quiz_id: QuizId,
        topic: impl Into<String>,
        prompt: impl Into<String>,
        alternatives: Vec<String>,
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            quiz_id,
            topic: topic.into(),
            prompt: prompt.into(),
            alternatives,
            correct_answer: correct_answer.into(),
            explanation: None,
            difficulty: 1,
        }
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: u8) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Validate the draft and assign an identifier.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` describing the first rule the draft violates.
    pub fn validate(self, id: QuestionId) -> Result<Question, QuestionError> {
        let topic = self.topic.trim().to_owned();
        if topic.is_empty() {
            return Err(QuestionError::EmptyTopic);
        }
        let len = topic.chars().count();
        if len > MAX_TOPIC_CHARS {
            return Err(QuestionError::TopicTooLong { len });
        }

        let prompt = self.prompt.trim().to_owned();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        let count = self.alternatives.len();
        if !(MIN_ALTERNATIVES..=MAX_ALTERNATIVES).contains(&count) {
            return Err(QuestionError::AlternativeCount { count });
        }
        if self.alternatives.iter().any(|a| a.trim().is_empty()) {
            return Err(QuestionError::BlankAlternative);
        }
        if !self.alternatives.contains(&self.correct_answer) {
            return Err(QuestionError::CorrectAnswerNotListed);
        }

        if !(1..=5).contains(&self.difficulty) {
            return Err(QuestionError::InvalidDifficulty(self.difficulty));
        }

        Ok(Question {
            id,
            quiz_id: self.quiz_id,
            topic,
            prompt,
            alternatives: self.alternatives,
            correct_answer: self.correct_answer,
            explanation: self
                .explanation
                .map(|e| e.trim().to_owned())
                .filter(|e| !e.is_empty()),
            difficulty: self.difficulty,
        })
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A validated multiple-choice question tagged with a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    quiz_id: QuizId,
    topic: String,
    prompt: String,
    alternatives: Vec<String>,
    correct_answer: String,
    explanation: Option<String>,
    difficulty: u8,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn alternatives(&self) -> &[String] {
        &self.alternatives
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }

    /// Exact-match answer check.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn draft() -> QuestionDraft {
        QuestionDraft::new(QuizId::new(1), " Algebra ", "2 + 2?", alts(&["3", "4"]), "4")
    }

    #[test]
    fn validates_and_trims() {
        let q = draft()
            .with_explanation("basic sum")
            .with_difficulty(2)
            .validate(QuestionId::new(9))
            .unwrap();
        assert_eq!(q.topic(), "Algebra");
        assert_eq!(q.difficulty(), 2);
        assert_eq!(q.explanation(), Some("basic sum"));
        assert!(q.is_correct("4"));
        assert!(!q.is_correct("3"));
    }

    #[test]
    fn rejects_correct_answer_outside_alternatives() {
        let mut d = draft();
        d.correct_answer = "5".into();
        assert_eq!(
            d.validate(QuestionId::new(1)).unwrap_err(),
            QuestionError::CorrectAnswerNotListed
        );
    }

    #[test]
    fn rejects_alternative_counts() {
        let mut d = draft();
        d.alternatives = alts(&["4"]);
        assert_eq!(
            d.validate(QuestionId::new(1)).unwrap_err(),
            QuestionError::AlternativeCount { count: 1 }
        );

        let mut d = draft();
        d.alternatives = alts(&["1", "2", "3", "4", "5", "6", "7"]);
        assert!(matches!(
            d.validate(QuestionId::new(1)),
            Err(QuestionError::AlternativeCount { count: 7 })
        ));
    }

    #[test]
    fn rejects_bad_difficulty_and_blank_fields() {
        assert_eq!(
            draft().with_difficulty(0).validate(QuestionId::new(1)).unwrap_err(),
            QuestionError::InvalidDifficulty(0)
        );

        let mut d = draft();
        d.topic = "   ".into();
        assert_eq!(d.validate(QuestionId::new(1)).unwrap_err(), QuestionError::EmptyTopic);

        let mut d = draft();
        d.prompt = String::new();
        assert_eq!(d.validate(QuestionId::new(1)).unwrap_err(), QuestionError::EmptyPrompt);
    }
}
