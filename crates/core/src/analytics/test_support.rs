//! Session builders shared by the analytics unit tests.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::model::{QuizId, SessionId, SessionRecord, SessionRecordDraft, TopicBreakdown, TopicStats};

/// A session whose totals are the sums of the given `(topic, correct, incorrect, avg_seconds)` rows.
pub(crate) fn session(at: DateTime<Utc>, topics: &[(&str, u32, u32, f64)]) -> SessionRecord {
    let mut map = BTreeMap::new();
    let (mut correct, mut incorrect, mut seconds) = (0u32, 0u32, 0.0);
    for &(name, c, i, avg) in topics {
        map.insert(name.to_string(), TopicStats::new(c, i, avg));
        correct += c;
        incorrect += i;
        seconds += avg * f64::from(c + i);
    }
    let total = correct + incorrect;
    let average = if total == 0 { 0.0 } else { seconds / f64::from(total) };

    SessionRecordDraft {
        id: SessionId::generate(),
        quiz_id: QuizId::new(1),
        timestamp: at,
        total_questions: total,
        correct_count: correct,
        incorrect_count: incorrect,
        average_response_seconds: average,
        topic_breakdown: map.into(),
    }
    .validate()
    .expect("test session should be valid")
}

/// A session with flat totals and no topic breakdown.
pub(crate) fn flat_session(
    at: DateTime<Utc>,
    correct: u32,
    incorrect: u32,
    average_response_seconds: f64,
) -> SessionRecord {
    SessionRecordDraft {
        id: SessionId::generate(),
        quiz_id: QuizId::new(1),
        timestamp: at,
        total_questions: correct + incorrect,
        correct_count: correct,
        incorrect_count: incorrect,
        average_response_seconds,
        topic_breakdown: TopicBreakdown::default(),
    }
    .validate()
    .expect("test session should be valid")
}

/// A one-question session carrying a raw, possibly corrupt, topic payload.
pub(crate) fn session_with_payload(at: DateTime<Utc>, raw: &str) -> SessionRecord {
    SessionRecordDraft {
        id: SessionId::generate(),
        quiz_id: QuizId::new(1),
        timestamp: at,
        total_questions: 1,
        correct_count: 1,
        incorrect_count: 0,
        average_response_seconds: 5.0,
        topic_breakdown: TopicBreakdown::Encoded(raw.to_string()),
    }
    .validate()
    .expect("test session should be valid")
}
