use serde::Serialize;

use crate::model::SessionRecord;

/// Totals over a session history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistorySummary {
    pub total_sessions: usize,
    pub questions_answered: u64,
    pub correct: u64,
    pub incorrect: u64,
    pub accuracy: f64,
    /// Scores are on a 0–10 scale.
    pub average_score: f64,
    pub best_score: f64,
    pub worst_score: f64,
    pub total_study_seconds: f64,
}

impl HistorySummary {
    /// Summarise `sessions`; an empty history yields all zeros.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_sessions(sessions: &[SessionRecord]) -> Self {
        if sessions.is_empty() {
            return Self::default();
        }

        let correct: u64 = sessions.iter().map(|s| u64::from(s.correct_count())).sum();
        let incorrect: u64 = sessions.iter().map(|s| u64::from(s.incorrect_count())).sum();
        let answered = correct + incorrect;

        let scores: Vec<f64> = sessions.iter().map(SessionRecord::score).collect();
        let best_score = scores.iter().copied().fold(f64::MIN, f64::max);
        let worst_score = scores.iter().copied().fold(f64::MAX, f64::min);

        Self {
            total_sessions: sessions.len(),
            questions_answered: answered,
            correct,
            incorrect,
            accuracy: if answered == 0 { 0.0 } else { correct as f64 / answered as f64 },
            average_score: scores.iter().sum::<f64>() / scores.len() as f64,
            best_score,
            worst_score,
            total_study_seconds: sessions.iter().map(SessionRecord::study_seconds).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::flat_session;
    use crate::time::fixed_now;

    #[test]
    fn empty_history_is_all_zero() {
        assert_eq!(HistorySummary::from_sessions(&[]), HistorySummary::default());
    }

    #[test]
    fn totals_and_scores() {
        let now = fixed_now();
        let sessions = vec![
            flat_session(now, 8, 2, 10.0),
            flat_session(now, 3, 7, 5.0),
            flat_session(now, 5, 0, 2.0),
        ];
        let summary = HistorySummary::from_sessions(&sessions);

        assert_eq!(summary.total_sessions, 3);
        assert_eq!(summary.questions_answered, 25);
        assert_eq!(summary.correct, 16);
        assert_eq!(summary.incorrect, 9);
        assert!((summary.accuracy - 0.64).abs() < 1e-12);
        assert!((summary.best_score - 10.0).abs() < 1e-12);
        assert!((summary.worst_score - 3.0).abs() < 1e-12);
        assert!((summary.average_score - 7.0).abs() < 1e-12);
        assert!((summary.total_study_seconds - 160.0).abs() < 1e-12);
    }
}
