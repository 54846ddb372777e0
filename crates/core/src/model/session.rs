use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{QuizId, SessionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SessionRecordError {
    #[error("total questions ({total}) does not match correct + incorrect ({sum})")]
    CountMismatch { total: u32, sum: u64 },

    #[error("average response time must be finite and non-negative, got {0}")]
    InvalidResponseTime(f64),

    #[error("topic name cannot be empty")]
    EmptyTopic,
}

/// A session whose topic breakdown could not be decoded.
///
/// Recovered locally by the aggregator: the session's topic contributions are
/// skipped and the rest of the history is still analysed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("session {session_id} has a malformed topic breakdown: {reason}")]
pub struct MalformedRecordError {
    pub session_id: SessionId,
    pub reason: String,
}

//
// ─── TOPIC BREAKDOWN ───────────────────────────────────────────────────────────
//

/// Per-topic counts recorded for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicStats {
    pub correct: u32,
    #[serde(alias = "wrong")]
    pub incorrect: u32,
    pub average_response_seconds: f64,
}

impl TopicStats {
    #[must_use]
    pub fn new(correct: u32, incorrect: u32, average_response_seconds: f64) -> Self {
        Self {
            correct,
            incorrect,
            average_response_seconds,
        }
    }

    #[must_use]
    pub fn answered(&self) -> u64 {
        u64::from(self.correct) + u64::from(self.incorrect)
    }
}

/// Topic breakdown of a session, either already structured or still in the
/// encoded form the persistence layer stored it in.
///
/// Storage adapters hand back `Encoded` payloads untouched so that a corrupt
/// row only affects its own topic contributions, not the whole read.
#[derive(Debug, Clone, PartialEq)]
pub enum TopicBreakdown {
    Decoded(BTreeMap<String, TopicStats>),
    Encoded(String),
}

impl Default for TopicBreakdown {
    fn default() -> Self {
        Self::Decoded(BTreeMap::new())
    }
}

impl TopicBreakdown {
    /// Decode (if needed) and validate the per-topic entries.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the payload is not a JSON object of
    /// topic stats, a topic name is blank, or a response time is negative or
    /// not finite.
    pub fn decode(&self) -> Result<Cow<'_, BTreeMap<String, TopicStats>>, String> {
        let topics = match self {
            TopicBreakdown::Decoded(map) => Cow::Borrowed(map),
            TopicBreakdown::Encoded(raw) => {
                let map: BTreeMap<String, TopicStats> =
                    serde_json::from_str(raw).map_err(|e| e.to_string())?;
                Cow::Owned(map)
            }
        };

        for (name, stats) in topics.iter() {
            if name.trim().is_empty() {
                return Err("empty topic name".into());
            }
            if !stats.average_response_seconds.is_finite() || stats.average_response_seconds < 0.0
            {
                return Err(format!(
                    "invalid response time for topic {name}: {}",
                    stats.average_response_seconds
                ));
            }
        }

        Ok(topics)
    }

    /// Encode to the JSON text form used by storage adapters.
    ///
    /// `Encoded` payloads are returned verbatim.
    ///
    /// # Errors
    ///
    /// Returns the serializer message if encoding fails.
    pub fn encode(&self) -> Result<String, String> {
        match self {
            TopicBreakdown::Decoded(map) => serde_json::to_string(map).map_err(|e| e.to_string()),
            TopicBreakdown::Encoded(raw) => Ok(raw.clone()),
        }
    }
}

impl From<BTreeMap<String, TopicStats>> for TopicBreakdown {
    fn from(map: BTreeMap<String, TopicStats>) -> Self {
        Self::Decoded(map)
    }
}

//
// ─── SESSION RECORD ────────────────────────────────────────────────────────────
//

/// Unvalidated input for a `SessionRecord`.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecordDraft {
    pub id: SessionId,
    pub quiz_id: QuizId,
    pub timestamp: DateTime<Utc>,
    pub total_questions: u32,
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub average_response_seconds: f64,
    pub topic_breakdown: TopicBreakdown,
}

impl SessionRecordDraft {
    /// Validate counts and timings and freeze the record.
    ///
    /// Encoded topic payloads are not decoded here; see `SessionRecord::topics`.
    ///
    /// # Errors
    ///
    /// - `CountMismatch` if `correct + incorrect != total`
    /// - `InvalidResponseTime` if the average is negative or not finite
    /// - `EmptyTopic` if a decoded breakdown contains a blank topic name
    pub fn validate(self) -> Result<SessionRecord, SessionRecordError> {
        let sum = u64::from(self.correct_count) + u64::from(self.incorrect_count);
        if sum != u64::from(self.total_questions) {
            return Err(SessionRecordError::CountMismatch {
                total: self.total_questions,
                sum,
            });
        }

        if !self.average_response_seconds.is_finite() || self.average_response_seconds < 0.0 {
            return Err(SessionRecordError::InvalidResponseTime(
                self.average_response_seconds,
            ));
        }

        if let TopicBreakdown::Decoded(map) = &self.topic_breakdown {
            if map.keys().any(|name| name.trim().is_empty()) {
                return Err(SessionRecordError::EmptyTopic);
            }
        }

        Ok(SessionRecord {
            id: self.id,
            quiz_id: self.quiz_id,
            timestamp: self.timestamp,
            total_questions: self.total_questions,
            correct_count: self.correct_count,
            incorrect_count: self.incorrect_count,
            average_response_seconds: self.average_response_seconds,
            topic_breakdown: self.topic_breakdown,
        })
    }
}

/// One completed quiz attempt. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    id: SessionId,
    quiz_id: QuizId,
    timestamp: DateTime<Utc>,
    total_questions: u32,
    correct_count: u32,
    incorrect_count: u32,
    average_response_seconds: f64,
    topic_breakdown: TopicBreakdown,
}

impl SessionRecord {
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn incorrect_count(&self) -> u32 {
        self.incorrect_count
    }

    #[must_use]
    pub fn average_response_seconds(&self) -> f64 {
        self.average_response_seconds
    }

    #[must_use]
    pub fn topic_breakdown(&self) -> &TopicBreakdown {
        &self.topic_breakdown
    }

    /// Fraction of questions answered correctly, 0 for an empty session.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        f64::from(self.correct_count) / f64::from(self.total_questions)
    }

    /// Score on a 0–10 scale.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.accuracy() * 10.0
    }

    /// Time spent answering, derived from the per-question average.
    #[must_use]
    pub fn study_seconds(&self) -> f64 {
        self.average_response_seconds * f64::from(self.total_questions)
    }

    /// Decoded per-topic breakdown.
    ///
    /// # Errors
    ///
    /// Returns `MalformedRecordError` if the stored payload cannot be decoded.
    pub fn topics(&self) -> Result<Cow<'_, BTreeMap<String, TopicStats>>, MalformedRecordError> {
        self.topic_breakdown
            .decode()
            .map_err(|reason| MalformedRecordError {
                session_id: self.id,
                reason,
            })
    }
}
