use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::QuizId;

const MAX_NAME_CHARS: usize = 255;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz name cannot be empty")]
    EmptyName,

    #[error("quiz name is too long: {len} characters (max 255)")]
    NameTooLong { len: usize },
}

/// A named question bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    id: QuizId,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl Quiz {
    /// Creates a quiz, trimming the name and dropping a blank description.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyName` or `QuizError::NameTooLong`.
    pub fn new(
        id: QuizId,
        name: impl Into<String>,
        description: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, QuizError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(QuizError::EmptyName);
        }
        let len = name.chars().count();
        if len > MAX_NAME_CHARS {
            return Err(QuizError::NameTooLong { len });
        }

        let description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());

        Ok(Self {
            id,
            name,
            description,
            created_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
