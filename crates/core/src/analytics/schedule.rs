use std::cmp::Ordering;

use serde::Serialize;

use super::retention::TopicRetention;

const SOON_HOURS: f64 = 24.0;

/// Order topics for review: highest priority first, then the soonest due.
///
/// The sort is stable, so topics that tie on both keys keep their input
/// order and sorting an already sorted list is a no-op.
#[must_use]
pub fn build_study_schedule(mut topics: Vec<TopicRetention>) -> Vec<TopicRetention> {
    topics.sort_by(schedule_order);
    topics
}

fn schedule_order(a: &TopicRetention, b: &TopicRetention) -> Ordering {
    b.priority_index
        .total_cmp(&a.priority_index)
        .then_with(|| a.hours_until_review.total_cmp(&b.hours_until_review))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewUrgency {
    ReviewNow,
    Soon,
    Later,
}

impl ReviewUrgency {
    #[must_use]
    pub fn from_hours(hours_until_review: f64) -> Self {
        if hours_until_review <= 0.0 {
            ReviewUrgency::ReviewNow
        } else if hours_until_review < SOON_HOURS {
            ReviewUrgency::Soon
        } else {
            ReviewUrgency::Later
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ReviewUrgency::ReviewNow => "review now",
            ReviewUrgency::Soon => "soon",
            ReviewUrgency::Later => "later",
        }
    }
}

/// One row of a study plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntry {
    /// 1-based position in the plan.
    pub rank: usize,
    pub urgency: ReviewUrgency,
    #[serde(flatten)]
    pub retention: TopicRetention,
}

/// Sort topics with `build_study_schedule` and tag each with its rank and urgency.
#[must_use]
pub fn schedule_entries(topics: Vec<TopicRetention>) -> Vec<ScheduleEntry> {
    build_study_schedule(topics)
        .into_iter()
        .enumerate()
        .map(|(i, retention)| ScheduleEntry {
            rank: i + 1,
            urgency: ReviewUrgency::from_hours(retention.hours_until_review),
            retention,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(name: &str, priority_index: f64, hours_until_review: f64) -> TopicRetention {
        TopicRetention {
            topic: name.to_string(),
            retention_rate: 0.5,
            priority_index,
            hours_until_review,
            accuracy: 0.5,
            exposures: 1,
            hours_since_review: 0.0,
        }
    }

    fn names(topics: &[TopicRetention]) -> Vec<&str> {
        topics.iter().map(|t| t.topic.as_str()).collect()
    }

    #[test]
    fn empty_schedule() {
        assert!(build_study_schedule(Vec::new()).is_empty());
        assert!(schedule_entries(Vec::new()).is_empty());
    }

    #[test]
    fn sorts_by_priority_then_due_time() {
        let schedule = build_study_schedule(vec![
            topic("low", 0.1, 0.0),
            topic("high-later", 0.9, 50.0),
            topic("high-now", 0.9, 0.0),
            topic("mid", 0.5, 10.0),
        ]);
        assert_eq!(names(&schedule), ["high-now", "high-later", "mid", "low"]);
    }

    #[test]
    fn full_ties_keep_input_order() {
        let schedule = build_study_schedule(vec![
            topic("first", 0.5, 3.0),
            topic("second", 0.5, 3.0),
            topic("third", 0.5, 3.0),
        ]);
        assert_eq!(names(&schedule), ["first", "second", "third"]);
    }

    #[test]
    fn scheduling_is_idempotent() {
        let once = build_study_schedule(vec![
            topic("a", 0.2, 5.0),
            topic("b", 0.8, 1.0),
            topic("c", 0.8, 0.0),
            topic("d", 0.2, 5.0),
        ]);
        let twice = build_study_schedule(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn urgency_thresholds() {
        assert_eq!(ReviewUrgency::from_hours(0.0), ReviewUrgency::ReviewNow);
        assert_eq!(ReviewUrgency::from_hours(23.9), ReviewUrgency::Soon);
        assert_eq!(ReviewUrgency::from_hours(24.0), ReviewUrgency::Later);
    }

    #[test]
    fn entries_are_ranked() {
        let entries = schedule_entries(vec![topic("b", 0.1, 30.0), topic("a", 0.9, 0.0)]);
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[0].retention.topic, "a");
        assert_eq!(entries[0].urgency, ReviewUrgency::ReviewNow);
        assert_eq!(entries[1].urgency, ReviewUrgency::Later);
    }
}
