use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use super::aggregate::aggregate_by_topic;
use super::config::{AnalyticsConfig, ExamParameters};
use super::retention::{TopicRetention, estimate_retention};
use super::stats::{mean_squared_log_error, normal_cdf};
use super::AnalyticsError;
use crate::model::SessionRecord;

/// Expected outcome of a hypothetical exam.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Expected number of correct answers, unrounded.
    pub predicted_correct: f64,
    pub predicted_duration_seconds: f64,
    /// Chance of reaching the passing threshold, in percent.
    pub pass_probability: f64,
    /// Historical share of correct answers the prediction is based on.
    pub accuracy: f64,
    pub topic_retention: Vec<TopicRetention>,
}

/// Predict exam performance from the full session history.
///
/// Uses a normal approximation to the binomial distribution with a continuity
/// correction, then discounts the result by the mean squared log error between
/// each past session's score and what the overall rate would have predicted
/// for it.
///
/// # Errors
///
/// Returns `AnalyticsError::InsufficientData` if `sessions` is empty or no
/// question was ever answered.
#[allow(clippy::cast_precision_loss)]
pub fn predict_performance(
    sessions: &[SessionRecord],
    exam: &ExamParameters,
    now: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> Result<PredictionResult, AnalyticsError> {
    if sessions.is_empty() {
        return Err(AnalyticsError::InsufficientData);
    }

    let total_questions: u64 = sessions.iter().map(|s| u64::from(s.total_questions())).sum();
    if total_questions == 0 {
        return Err(AnalyticsError::InsufficientData);
    }
    let total_correct: u64 = sessions.iter().map(|s| u64::from(s.correct_count())).sum();

    let p = total_correct as f64 / total_questions as f64;
    let n = f64::from(exam.question_count());
    let threshold = f64::from(exam.passing_threshold());

    let mean = p * n;
    let stddev = (n * p * (1.0 - p)).sqrt();

    let raw_probability = if stddev == 0.0 {
        if mean >= threshold - 0.5 { 100.0 } else { 0.0 }
    } else {
        let z = ((threshold - 0.5) - mean) / stddev;
        (1.0 - normal_cdf(z)) * 100.0
    };

    let msle = sessions
        .iter()
        .map(|s| {
            mean_squared_log_error(
                f64::from(s.correct_count()),
                p * f64::from(s.total_questions()),
            )
        })
        .sum::<f64>()
        / sessions.len() as f64;
    let adjustment = (msle / n) * 100.0;
    let pass_probability = (raw_probability - adjustment).clamp(0.0, 100.0);

    let weighted_seconds: f64 = sessions.iter().map(SessionRecord::study_seconds).sum();
    let average_response_seconds = weighted_seconds / total_questions as f64;

    let topic_retention = estimate_retention(&aggregate_by_topic(sessions), now, config);

    debug!(
        sessions = sessions.len(),
        accuracy = p,
        raw_probability,
        adjustment,
        pass_probability,
        "predicted exam performance"
    );

    Ok(PredictionResult {
        predicted_correct: mean,
        predicted_duration_seconds: average_response_seconds * n,
        pass_probability,
        accuracy: p,
        topic_retention,
    })
}

/// Monte Carlo estimate of the pass probability, in percent.
///
/// Simulates `trials` exams where each question is answered correctly with
/// probability `p` and counts how many reach the passing threshold. Useful as a
/// cross-check of the normal approximation for small exams.
#[must_use]
pub fn simulate_pass_probability<R: Rng + ?Sized>(
    p: f64,
    exam: &ExamParameters,
    trials: u32,
    rng: &mut R,
) -> f64 {
    if trials == 0 {
        return 0.0;
    }
    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };

    let passed = (0..trials)
        .filter(|_| {
            let correct = (0..exam.question_count())
                .filter(|_| rng.random_bool(p))
                .count();
            correct >= exam.passing_threshold() as usize
        })
        .count();

    f64::from(u32::try_from(passed).unwrap_or(trials)) / f64::from(trials) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::{flat_session, session};
    use crate::time::fixed_now;
    use chrono::Duration;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn exam(questions: u32, passing: u32) -> ExamParameters {
        ExamParameters::try_new(questions, passing).unwrap()
    }

    #[test]
    fn empty_history_is_insufficient() {
        let err = predict_performance(&[], &exam(10, 5), fixed_now(), &AnalyticsConfig::default())
            .unwrap_err();
        assert_eq!(err, AnalyticsError::InsufficientData);
    }

    #[test]
    fn unanswered_history_is_insufficient() {
        let sessions = vec![flat_session(fixed_now(), 0, 0, 0.0)];
        let err = predict_performance(&sessions, &exam(10, 5), fixed_now(), &AnalyticsConfig::default())
            .unwrap_err();
        assert_eq!(err, AnalyticsError::InsufficientData);
    }

    #[test]
    fn perfect_history_uses_point_mass() {
        let sessions = vec![flat_session(fixed_now(), 10, 0, 4.0)];
        let result = predict_performance(&sessions, &exam(10, 10), fixed_now(), &AnalyticsConfig::default())
            .unwrap();
        assert_eq!(result.pass_probability, 100.0);
        assert_eq!(result.predicted_correct, 10.0);
        assert_eq!(result.predicted_duration_seconds, 40.0);
    }

    #[test]
    fn hopeless_history_never_passes() {
        let sessions = vec![flat_session(fixed_now(), 0, 10, 4.0)];
        let result = predict_performance(&sessions, &exam(10, 1), fixed_now(), &AnalyticsConfig::default())
            .unwrap();
        assert_eq!(result.pass_probability, 0.0);
        assert_eq!(result.predicted_correct, 0.0);
    }

    #[test]
    fn applies_continuity_correction_and_msle_discount() {
        let now = fixed_now();
        let sessions = vec![
            flat_session(now - Duration::hours(5), 7, 3, 10.0),
            flat_session(now, 5, 5, 20.0),
        ];
        let result = predict_performance(&sessions, &exam(20, 12), now, &AnalyticsConfig::default())
            .unwrap();

        let p: f64 = 0.6;
        let mean = p * 20.0;
        let z = (11.5 - mean) / (20.0 * p * (1.0 - p)).sqrt();
        let raw = (1.0 - normal_cdf(z)) * 100.0;
        let msle = (mean_squared_log_error(7.0, 6.0) + mean_squared_log_error(5.0, 6.0)) / 2.0;
        let expected = raw - msle / 20.0 * 100.0;

        assert!((result.accuracy - p).abs() < 1e-12);
        assert!((result.predicted_correct - 12.0).abs() < 1e-9);
        assert!((result.pass_probability - expected).abs() < 1e-9);
        assert!(result.pass_probability < raw);
        assert!((result.predicted_duration_seconds - 300.0).abs() < 1e-9);
    }

    #[test]
    fn includes_topic_retention() {
        let now = fixed_now();
        let sessions = vec![
            session(now - Duration::hours(48), &[("Algebra", 8, 2, 10.0)]),
            session(now - Duration::hours(2), &[("Algebra", 5, 5, 10.0), ("Geometry", 3, 0, 6.0)]),
        ];
        let result = predict_performance(&sessions, &exam(10, 6), now, &AnalyticsConfig::default())
            .unwrap();
        let mut topics: Vec<_> = result.topic_retention.iter().map(|t| t.topic.as_str()).collect();
        topics.sort_unstable();
        assert_eq!(topics, ["Algebra", "Geometry"]);
        assert!((0.0..=100.0).contains(&result.pass_probability));
    }

    #[test]
    fn simulation_tracks_normal_approximation() {
        let mut rng = StdRng::seed_from_u64(7);
        let simulated = simulate_pass_probability(0.6, &exam(20, 12), 20_000, &mut rng);
        // Exact binomial tail is ~59.6%.
        assert!((simulated - 59.6).abs() < 2.0, "simulated {simulated}");
    }

    #[test]
    fn simulation_edge_cases() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(simulate_pass_probability(1.0, &exam(5, 5), 100, &mut rng), 100.0);
        assert_eq!(simulate_pass_probability(0.0, &exam(5, 1), 100, &mut rng), 0.0);
        assert_eq!(simulate_pass_probability(0.5, &exam(5, 1), 0, &mut rng), 0.0);
    }
}
