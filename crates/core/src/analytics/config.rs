use serde::Serialize;

use super::AnalyticsError;

/// Forgetting-curve decay rate, per hour.
pub const DEFAULT_DECAY_RATE: f64 = 0.0005;

/// Retention level the next-review estimate aims for.
pub const DEFAULT_DESIRED_RETENTION: f64 = 0.85;

//
// ─── ANALYTICS CONFIG ──────────────────────────────────────────────────────────
//

/// Tunable knobs for the retention model.
///
/// # Examples
///
/// ```
/// # use quiz_core::analytics::AnalyticsConfig;
/// let config = AnalyticsConfig::try_new(0.001, 0.9)?;
/// assert_eq!(config.decay_rate(), 0.001);
///
/// assert!(AnalyticsConfig::try_new(0.0, 0.9).is_err());
/// # Ok::<(), quiz_core::analytics::AnalyticsError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalyticsConfig {
    decay_rate: f64,
    desired_retention: f64,
}

impl AnalyticsConfig {
    /// Create a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InvalidConfig` if `decay_rate` is not a finite
    /// positive number or `desired_retention` is outside `(0, 1]`.
    pub fn try_new(decay_rate: f64, desired_retention: f64) -> Result<Self, AnalyticsError> {
        if !decay_rate.is_finite() || decay_rate <= 0.0 {
            return Err(AnalyticsError::InvalidConfig {
                reason: format!("decay rate must be finite and > 0, got {decay_rate}"),
            });
        }
        if !(desired_retention > 0.0 && desired_retention <= 1.0) {
            return Err(AnalyticsError::InvalidConfig {
                reason: format!("desired retention must be in (0, 1], got {desired_retention}"),
            });
        }

        Ok(Self {
            decay_rate,
            desired_retention,
        })
    }

    #[must_use]
    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    #[must_use]
    pub fn desired_retention(&self) -> f64 {
        self.desired_retention
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            decay_rate: DEFAULT_DECAY_RATE,
            desired_retention: DEFAULT_DESIRED_RETENTION,
        }
    }
}

//
// ─── EXAM PARAMETERS ───────────────────────────────────────────────────────────
//

/// Shape of the exam a prediction is made for. No defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExamParameters {
    question_count: u32,
    passing_threshold: u32,
}

impl ExamParameters {
    /// # Errors
    ///
    /// Returns `AnalyticsError::InvalidExam` if either value is zero.
    pub fn try_new(question_count: u32, passing_threshold: u32) -> Result<Self, AnalyticsError> {
        if question_count == 0 {
            return Err(AnalyticsError::InvalidExam {
                reason: "question count must be >= 1".into(),
            });
        }
        if passing_threshold == 0 {
            return Err(AnalyticsError::InvalidExam {
                reason: "passing threshold must be >= 1".into(),
            });
        }

        Ok(Self {
            question_count,
            passing_threshold,
        })
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    /// Minimum number of correct answers needed to pass.
    #[must_use]
    pub fn passing_threshold(&self) -> u32 {
        self.passing_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_constants() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.decay_rate(), 0.0005);
        assert_eq!(config.desired_retention(), 0.85);
    }

    #[test]
    fn rejects_invalid_config_values() {
        for (rate, retention) in [
            (0.0, 0.85),
            (-0.1, 0.85),
            (f64::NAN, 0.85),
            (f64::INFINITY, 0.85),
            (0.0005, 0.0),
            (0.0005, 1.5),
            (0.0005, f64::NAN),
        ] {
            assert!(
                matches!(
                    AnalyticsConfig::try_new(rate, retention),
                    Err(AnalyticsError::InvalidConfig { .. })
                ),
                "accepted rate={rate} retention={retention}"
            );
        }
        assert!(AnalyticsConfig::try_new(0.0005, 1.0).is_ok());
    }

    #[test]
    fn exam_parameters_require_positive_values() {
        assert!(ExamParameters::try_new(0, 1).is_err());
        assert!(ExamParameters::try_new(10, 0).is_err());
        let exam = ExamParameters::try_new(50, 30).unwrap();
        assert_eq!(exam.question_count(), 50);
        assert_eq!(exam.passing_threshold(), 30);
    }
}
