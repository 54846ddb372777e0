use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::model::{MalformedRecordError, SessionRecord};

/// Per-topic totals folded from a session history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicAggregate {
    pub topic: String,
    pub correct_total: u64,
    pub incorrect_total: u64,
    /// Number of sessions that mention the topic.
    pub exposures: u32,
    pub last_seen_at: DateTime<Utc>,
    pub total_response_seconds: f64,
}

impl TopicAggregate {
    fn empty(topic: &str, seen_at: DateTime<Utc>) -> Self {
        Self {
            topic: topic.to_owned(),
            correct_total: 0,
            incorrect_total: 0,
            exposures: 0,
            last_seen_at: seen_at,
            total_response_seconds: 0.0,
        }
    }

    #[must_use]
    pub fn answered(&self) -> u64 {
        self.correct_total + self.incorrect_total
    }

    /// Share of correct answers; 0 when the topic has no answers.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn accuracy(&self) -> f64 {
        let answered = self.answered();
        if answered == 0 {
            return 0.0;
        }
        self.correct_total as f64 / answered as f64
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_response_seconds(&self) -> f64 {
        let answered = self.answered();
        if answered == 0 {
            return 0.0;
        }
        self.total_response_seconds / answered as f64
    }
}

/// Result of folding a history, including the sessions that were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub topics: BTreeMap<String, TopicAggregate>,
    pub malformed: Vec<MalformedRecordError>,
}

/// Fold sessions into per-topic aggregates, collecting malformed records.
///
/// Sessions may arrive in any order; only `last_seen_at` depends on
/// timestamps and it always takes the maximum. A session whose topic payload
/// cannot be decoded contributes nothing and is reported in `malformed`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn aggregate_sessions(sessions: &[SessionRecord]) -> Aggregation {
    let mut out = Aggregation::default();

    for session in sessions {
        let topics = match session.topics() {
            Ok(topics) => topics,
            Err(err) => {
                out.malformed.push(err);
                continue;
            }
        };

        let seen_at = session.timestamp();
        for (name, stats) in topics.iter() {
            let entry = out
                .topics
                .entry(name.clone())
                .or_insert_with(|| TopicAggregate::empty(name, seen_at));

            entry.correct_total += u64::from(stats.correct);
            entry.incorrect_total += u64::from(stats.incorrect);
            entry.exposures = entry.exposures.saturating_add(1);
            entry.total_response_seconds += stats.average_response_seconds * stats.answered() as f64;
            if seen_at > entry.last_seen_at {
                entry.last_seen_at = seen_at;
            }
        }
    }

    out
}

/// Fold sessions into per-topic aggregates keyed by topic name.
///
/// Malformed records are logged and skipped; they never abort the fold.
#[must_use]
pub fn aggregate_by_topic(sessions: &[SessionRecord]) -> BTreeMap<String, TopicAggregate> {
    let Aggregation { topics, malformed } = aggregate_sessions(sessions);
    for err in &malformed {
        warn!(session_id = %err.session_id, reason = %err.reason, "skipping malformed topic breakdown");
    }
    topics
}
