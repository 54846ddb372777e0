use std::collections::BTreeMap;
use std::sync::Arc;

use quiz_core::analytics::{
    AnalyticsConfig, AnalyticsError, ExamParameters, HistorySummary, PredictionResult,
    RetentionReport, ScheduleEntry, Trend, aggregate_by_topic, estimate_retention,
    predict_performance, schedule_entries, simulate_pass_probability, topic_trends,
};
use quiz_core::model::{QuizId, SessionRecord};
use rand::Rng;
use storage::repository::SessionHistoryProvider;
use tracing::debug;

use crate::Clock;
use crate::error::AnalyticsServiceError;

/// Runs the analytics engine over a fresh snapshot of the session history.
///
/// Holds no derived state: every call reloads the history and recomputes, so
/// concurrent callers never observe each other.
#[derive(Clone)]
pub struct AnalyticsService {
    clock: Clock,
    config: AnalyticsConfig,
    history: Arc<dyn SessionHistoryProvider>,
}

impl AnalyticsService {
    #[must_use]
    pub fn new(clock: Clock, history: Arc<dyn SessionHistoryProvider>) -> Self {
        Self {
            clock,
            config: AnalyticsConfig::default(),
            history,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: AnalyticsConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    async fn load(&self, quiz_id: Option<QuizId>) -> Result<Vec<SessionRecord>, AnalyticsServiceError> {
        let sessions = self.history.list_sessions(quiz_id).await?;
        debug!(?quiz_id, sessions = sessions.len(), "loaded session history");
        Ok(sessions)
    }

    async fn load_non_empty(
        &self,
        quiz_id: Option<QuizId>,
    ) -> Result<Vec<SessionRecord>, AnalyticsServiceError> {
        let sessions = self.load(quiz_id).await?;
        if sessions.is_empty() {
            return Err(AnalyticsError::InsufficientData.into());
        }
        Ok(sessions)
    }

    /// Predict the outcome of an exam from the recorded history.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InsufficientData` (wrapped) for an empty
    /// history, or `AnalyticsServiceError::Storage` if loading fails.
    pub async fn predict(
        &self,
        quiz_id: Option<QuizId>,
        exam: &ExamParameters,
    ) -> Result<PredictionResult, AnalyticsServiceError> {
        let sessions = self.load(quiz_id).await?;
        let result = predict_performance(&sessions, exam, self.clock.now(), &self.config)?;
        Ok(result)
    }

    /// Monte Carlo pass probability using the history's overall accuracy.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InsufficientData` (wrapped) if no question was
    /// ever answered, or `AnalyticsServiceError::Storage` if loading fails.
    pub async fn simulate_pass_probability<R: Rng + ?Sized>(
        &self,
        quiz_id: Option<QuizId>,
        exam: &ExamParameters,
        trials: u32,
        rng: &mut R,
    ) -> Result<f64, AnalyticsServiceError> {
        let summary = HistorySummary::from_sessions(&self.load(quiz_id).await?);
        if summary.questions_answered == 0 {
            return Err(AnalyticsError::InsufficientData.into());
        }
        Ok(simulate_pass_probability(summary.accuracy, exam, trials, rng))
    }

    /// Group per-topic retention into at-risk and mastered topics.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InsufficientData` (wrapped) for an empty
    /// history, or `AnalyticsServiceError::Storage` if loading fails.
    pub async fn retention_report(
        &self,
        quiz_id: Option<QuizId>,
    ) -> Result<RetentionReport, AnalyticsServiceError> {
        let sessions = self.load_non_empty(quiz_id).await?;
        let aggregates = aggregate_by_topic(&sessions);
        Ok(RetentionReport::build(&aggregates, self.clock.now(), &self.config))
    }

    /// Topics ranked for review, most urgent first.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InsufficientData` (wrapped) for an empty
    /// history, or `AnalyticsServiceError::Storage` if loading fails.
    pub async fn study_schedule(
        &self,
        quiz_id: Option<QuizId>,
    ) -> Result<Vec<ScheduleEntry>, AnalyticsServiceError> {
        let sessions = self.load_non_empty(quiz_id).await?;
        let aggregates = aggregate_by_topic(&sessions);
        let retention = estimate_retention(&aggregates, self.clock.now(), &self.config);
        Ok(schedule_entries(retention))
    }

    /// Totals over the history. An empty history yields zeros.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsServiceError::Storage` if loading fails.
    pub async fn summary(
        &self,
        quiz_id: Option<QuizId>,
    ) -> Result<HistorySummary, AnalyticsServiceError> {
        let sessions = self.load(quiz_id).await?;
        Ok(HistorySummary::from_sessions(&sessions))
    }

    /// Accuracy trend per topic.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsServiceError::Storage` if loading fails.
    pub async fn topic_trends(
        &self,
        quiz_id: Option<QuizId>,
    ) -> Result<BTreeMap<String, Trend>, AnalyticsServiceError> {
        let sessions = self.load(quiz_id).await?;
        Ok(topic_trends(&sessions))
    }
}
