use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use super::stats::least_squares_slope;
use crate::model::SessionRecord;

/// Slope, in accuracy per session, beyond which a series counts as moving.
const TREND_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

/// Classify a chronological series by its least-squares slope.
#[must_use]
pub fn linear_trend(points: &[f64]) -> Trend {
    match least_squares_slope(points) {
        Some(slope) if slope > TREND_THRESHOLD => Trend::Improving,
        Some(slope) if slope < -TREND_THRESHOLD => Trend::Declining,
        _ => Trend::Stable,
    }
}

/// Accuracy of one topic within one session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccuracySample {
    pub timestamp: DateTime<Utc>,
    pub accuracy: f64,
    pub answered: u64,
}

/// Per-topic accuracy samples, oldest first.
///
/// Sessions with a malformed topic breakdown are skipped, as are topics with
/// no answers in a given session.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn topic_accuracy_history(sessions: &[SessionRecord]) -> BTreeMap<String, Vec<AccuracySample>> {
    let mut history: BTreeMap<String, Vec<AccuracySample>> = BTreeMap::new();

    for session in sessions {
        let topics = match session.topics() {
            Ok(topics) => topics,
            Err(err) => {
                warn!(session_id = %err.session_id, reason = %err.reason, "skipping malformed topic breakdown");
                continue;
            }
        };

        for (name, stats) in topics.iter() {
            let answered = stats.answered();
            if answered == 0 {
                continue;
            }
            history.entry(name.clone()).or_default().push(AccuracySample {
                timestamp: session.timestamp(),
                accuracy: f64::from(stats.correct) / answered as f64,
                answered,
            });
        }
    }

    for samples in history.values_mut() {
        samples.sort_by_key(|s| s.timestamp);
    }
    history
}

/// Direction each topic's accuracy is moving in.
#[must_use]
pub fn topic_trends(sessions: &[SessionRecord]) -> BTreeMap<String, Trend> {
    topic_accuracy_history(sessions)
        .into_iter()
        .map(|(topic, samples)| {
            let points: Vec<f64> = samples.iter().map(|s| s.accuracy).collect();
            (topic, linear_trend(&points))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::{session, session_with_payload};
    use crate::time::fixed_now;
    use chrono::Duration;

    #[test]
    fn short_or_flat_series_are_stable() {
        assert_eq!(linear_trend(&[]), Trend::Stable);
        assert_eq!(linear_trend(&[0.9]), Trend::Stable);
        assert_eq!(linear_trend(&[0.5, 0.55, 0.52]), Trend::Stable);
    }

    #[test]
    fn detects_direction() {
        assert_eq!(linear_trend(&[0.2, 0.5, 0.8]), Trend::Improving);
        assert_eq!(linear_trend(&[0.9, 0.6, 0.2]), Trend::Declining);
    }

    #[test]
    fn history_is_chronological_per_topic() {
        let now = fixed_now();
        let sessions = vec![
            session(now, &[("Algebra", 9, 1, 5.0)]),
            session(now - Duration::hours(48), &[("Algebra", 2, 8, 5.0), ("Geometry", 0, 0, 0.0)]),
            session(now - Duration::hours(24), &[("Algebra", 5, 5, 5.0)]),
        ];

        let history = topic_accuracy_history(&sessions);
        assert!(!history.contains_key("Geometry"));

        let accuracies: Vec<f64> = history["Algebra"].iter().map(|s| s.accuracy).collect();
        assert_eq!(accuracies, [0.2, 0.5, 0.9]);
        assert_eq!(topic_trends(&sessions)["Algebra"], Trend::Improving);
    }

    #[test]
    fn malformed_sessions_do_not_break_trends() {
        let now = fixed_now();
        let sessions = vec![
            session(now - Duration::hours(2), &[("Algebra", 9, 1, 5.0)]),
            session_with_payload(now - Duration::hours(1), "[1, 2"),
            session(now, &[("Algebra", 1, 9, 5.0)]),
        ];
        assert_eq!(topic_trends(&sessions)["Algebra"], Trend::Declining);
    }
}
