//! Pure analytics over quiz session history.
//!
//! Every function here is synchronous and stateless: it recomputes from the
//! slice of `SessionRecord`s it is given and the explicit `now`, so concurrent
//! callers need no coordination.

use thiserror::Error;

mod aggregate;
mod config;
mod predict;
mod retention;
mod schedule;
pub mod stats;
mod summary;
mod trend;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregate::{Aggregation, TopicAggregate, aggregate_by_topic, aggregate_sessions};
pub use config::{
    AnalyticsConfig, DEFAULT_DECAY_RATE, DEFAULT_DESIRED_RETENTION, ExamParameters,
};
pub use predict::{PredictionResult, predict_performance, simulate_pass_probability};
pub use retention::{RetentionReport, TopicRetention, estimate_retention};
pub use schedule::{ReviewUrgency, ScheduleEntry, build_study_schedule, schedule_entries};
pub use summary::HistorySummary;
pub use trend::{AccuracySample, Trend, linear_trend, topic_accuracy_history, topic_trends};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum AnalyticsError {
    /// No sessions, or no answered questions, to compute from.
    #[error("insufficient data: no answered questions in session history")]
    InsufficientData,

    #[error("invalid analytics configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("invalid exam parameters: {reason}")]
    InvalidExam { reason: String },
}
