use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::aggregate::TopicAggregate;
use super::config::AnalyticsConfig;
use super::stats::{exponential_retention, hours_between, hours_until_target_retention};

/// Floor applied to probabilities before taking logarithms.
const PROBABILITY_FLOOR: f64 = 0.01;

const AT_RISK_RETENTION: f64 = 0.5;
const AT_RISK_HOURS: f64 = 168.0;
const MASTERED_ACCURACY: f64 = 0.8;
const MASTERED_EXPOSURES: u32 = 3;

/// Retention estimate for a single topic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicRetention {
    pub topic: String,
    /// Estimated recall probability right now, in `[0, 1]`.
    pub retention_rate: f64,
    /// Answer-history entropy divided by exposures. Higher is more urgent.
    pub priority_index: f64,
    /// Hours until retention drops to the desired level; 0 means due now.
    pub hours_until_review: f64,
    pub accuracy: f64,
    pub exposures: u32,
    pub hours_since_review: f64,
}

/// Estimate retention for every aggregated topic.
///
/// Output order is unspecified; see `build_study_schedule`.
#[must_use]
pub fn estimate_retention(
    aggregates: &BTreeMap<String, TopicAggregate>,
    now: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> Vec<TopicRetention> {
    aggregates
        .values()
        .map(|aggregate| estimate_topic(aggregate, now, config))
        .collect()
}

fn estimate_topic(
    aggregate: &TopicAggregate,
    now: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> TopicRetention {
    let p_correct = aggregate.accuracy();
    let p_correct_safe = p_correct.max(PROBABILITY_FLOOR);
    let p_incorrect_safe = (1.0 - p_correct).max(PROBABILITY_FLOOR);

    let entropy = -(p_correct_safe * p_correct_safe.log2()
        + p_incorrect_safe * p_incorrect_safe.log2());
    let priority_index = entropy / f64::from(aggregate.exposures.max(1));

    let elapsed_hours = hours_between(now, aggregate.last_seen_at);
    let hours_since_review = elapsed_hours.max(0.0);
    let retention_rate = exponential_retention(p_correct, hours_since_review, config.decay_rate());

    let mut hours_until_review = hours_until_target_retention(
        p_correct_safe,
        config.desired_retention(),
        config.decay_rate(),
    );
    // last_seen_at + hours_until_review already lies before now.
    if elapsed_hours > hours_until_review {
        hours_until_review = 0.0;
    }

    TopicRetention {
        topic: aggregate.topic.clone(),
        retention_rate,
        priority_index,
        hours_until_review,
        accuracy: p_correct,
        exposures: aggregate.exposures,
        hours_since_review,
    }
}

//
// ─── REPORT ────────────────────────────────────────────────────────────────────
//

/// Retention estimates grouped for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RetentionReport {
    /// Every topic, lowest retention first.
    pub all_topics: Vec<TopicRetention>,
    /// Retention below 50% or not reviewed for over a week.
    pub at_risk: Vec<TopicRetention>,
    /// Accuracy of at least 80% over three or more sessions, best first.
    pub mastered: Vec<TopicRetention>,
    pub overall_retention: f64,
    /// Questions answered across all topics.
    pub total_questions: u64,
}

impl RetentionReport {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn build(
        aggregates: &BTreeMap<String, TopicAggregate>,
        now: DateTime<Utc>,
        config: &AnalyticsConfig,
    ) -> Self {
        let mut all_topics = estimate_retention(aggregates, now, config);
        all_topics.sort_by(|a, b| a.retention_rate.total_cmp(&b.retention_rate));

        let at_risk = all_topics
            .iter()
            .filter(|t| t.retention_rate < AT_RISK_RETENTION || t.hours_since_review > AT_RISK_HOURS)
            .cloned()
            .collect();

        let mut mastered: Vec<_> = all_topics
            .iter()
            .filter(|t| t.accuracy >= MASTERED_ACCURACY && t.exposures >= MASTERED_EXPOSURES)
            .cloned()
            .collect();
        mastered.sort_by(|a, b| b.accuracy.total_cmp(&a.accuracy));

        let overall_retention = if all_topics.is_empty() {
            0.0
        } else {
            all_topics.iter().map(|t| t.retention_rate).sum::<f64>() / all_topics.len() as f64
        };

        Self {
            total_questions: aggregates.values().map(TopicAggregate::answered).sum(),
            all_topics,
            at_risk,
            mastered,
            overall_retention,
        }
    }
}
