//! Statistics primitives used by the retention and prediction models.

use chrono::{DateTime, Utc};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

// Abramowitz & Stegun 7.1.26.
const A1: f64 = 0.254_829_592;
const A2: f64 = -0.284_496_736;
const A3: f64 = 1.421_413_741;
const A4: f64 = -1.453_152_027;
const A5: f64 = 1.061_405_429;
const P: f64 = 0.327_591_1;

/// Error function via the Abramowitz–Stegun rational approximation.
///
/// Callers rely on this approximation's exact error profile (maximum absolute
/// error around 1.5e-7), not on the true `erf`.
#[must_use]
pub fn error_function(x: f64) -> f64 {
    let sign = if x >= 0.0 { 1.0 } else { -1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    let y = 1.0 - poly * (-x * x).exp();

    sign * y
}

/// Standard normal cumulative distribution function.
#[must_use]
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + error_function(z / std::f64::consts::SQRT_2))
}

/// Squared difference of `ln(1 + x)` values.
///
/// Both arguments are counts in practice; values below -1 yield NaN.
#[must_use]
pub fn mean_squared_log_error(actual: f64, predicted: f64) -> f64 {
    (actual.ln_1p() - predicted.ln_1p()).powi(2)
}

/// Exponential forgetting curve: `p_correct * e^(-decay_rate * hours)`.
///
/// `hours_since_review` must already be clamped to `>= 0` by the caller.
#[must_use]
pub fn exponential_retention(p_correct: f64, hours_since_review: f64, decay_rate: f64) -> f64 {
    p_correct * (-decay_rate * hours_since_review).exp()
}

/// Hours until retention decays from `p_correct` to `desired_retention`.
///
/// `p_correct` must be `> 0`; callers floor a zero accuracy to 0.01 first.
/// A target already above `p_correct` means "review now" and yields 0.
#[must_use]
pub fn hours_until_target_retention(
    p_correct: f64,
    desired_retention: f64,
    decay_rate: f64,
) -> f64 {
    let hours = -(desired_retention / p_correct).ln() / decay_rate;
    hours.max(0.0)
}

/// Signed fractional hours from `earlier` to `later`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn hours_between(later: DateTime<Utc>, earlier: DateTime<Utc>) -> f64 {
    later.signed_duration_since(earlier).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Least-squares slope of `points` against their indices.
///
/// Returns `None` for fewer than two points.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn least_squares_slope(points: &[f64]) -> Option<f64> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = points.iter().sum::<f64>() / n;

    let (numerator, denominator) = points.iter().enumerate().fold((0.0, 0.0), |(num, den), (i, y)| {
        let dx = i as f64 - x_mean;
        (num + dx * (y - y_mean), den + dx * dx)
    });

    (denominator > 0.0).then(|| numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    #[test]
    fn normal_cdf_at_zero_is_half() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn error_function_matches_reference_points() {
        // A&S 7.1.26 evaluated in f64; each differs from the true erf by 1e-8 or more.
        let cases = [
            (0.1, 0.112_462_965_622_195_49),
            (0.5, 0.520_500_016_304_747_2),
            (1.0, 0.842_700_689_747_589_9),
            (2.0, 0.995_322_139_581_218_8),
            (-1.0, -0.842_700_689_747_589_9),
            (-2.5, -0.999_592_964_536_606),
        ];
        for (x, expected) in cases {
            assert!(
                (error_function(x) - expected).abs() < 1e-12,
                "erf({x}) = {}",
                error_function(x)
            );
        }
    }

    #[test]
    fn error_function_keeps_approximation_offset_at_zero() {
        // The polynomial sums to 1 - 1e-9 at t = 1, so erf(0) is not exactly 0.
        let at_zero = error_function(0.0);
        assert!((at_zero - 1e-9).abs() < 1e-12, "erf(0) = {at_zero}");
        assert_eq!(error_function(6.0), 1.0);
        assert_eq!(error_function(-6.0), -1.0);
    }

    #[test]
    fn normal_cdf_saturates_for_large_inputs() {
        assert!(normal_cdf(10.0) > 0.999_999);
        assert!(normal_cdf(-10.0) < 1e-6);
        assert!((normal_cdf(1.96) - 0.975).abs() < 1e-4);
    }

    #[test]
    fn msle_is_zero_for_exact_predictions() {
        assert_eq!(mean_squared_log_error(7.0, 7.0), 0.0);
        let expected = (8.0_f64.ln() - 6.5_f64.ln()).powi(2);
        assert!((mean_squared_log_error(7.0, 5.5) - expected).abs() < 1e-12);
    }

    #[test]
    fn retention_without_elapsed_time_is_accuracy() {
        assert_eq!(exponential_retention(1.0, 0.0, 0.0005), 1.0);
        assert!((exponential_retention(0.65, 2.0, 0.0005) - 0.65 * (-0.001_f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn hours_until_target_is_zero_at_target() {
        assert_eq!(hours_until_target_retention(0.85, 0.85, 0.0005), 0.0);
    }

    #[test]
    fn hours_until_target_clamps_below_target() {
        assert_eq!(hours_until_target_retention(0.01, 0.85, 0.0005), 0.0);
    }

    #[test]
    fn hours_until_target_above_target() {
        let expected = -(0.85_f64).ln() / 0.0005;
        assert!((hours_until_target_retention(1.0, 0.85, 0.0005) - expected).abs() < 1e-9);
    }

    #[test]
    fn hours_between_is_signed() {
        let now = fixed_now();
        assert!((hours_between(now, now - Duration::minutes(90)) - 1.5).abs() < 1e-12);
        assert!((hours_between(now - Duration::hours(3), now) + 3.0).abs() < 1e-12);
    }

    #[test]
    fn slope_of_a_line() {
        assert_eq!(least_squares_slope(&[0.5]), None);
        assert!((least_squares_slope(&[1.0, 2.0, 3.0]).unwrap() - 1.0).abs() < 1e-12);
        assert!((least_squares_slope(&[0.9, 0.6, 0.3]).unwrap() + 0.3).abs() < 1e-12);
        assert_eq!(least_squares_slope(&[0.4, 0.4, 0.4]), Some(0.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_normal_cdf_is_symmetric(z in -8.0f64..8.0) {
                prop_assert!((normal_cdf(-z) - (1.0 - normal_cdf(z))).abs() < 1e-8);
            }

            #[test]
            fn prop_normal_cdf_is_non_decreasing(a in -8.0f64..8.0, b in -8.0f64..8.0) {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(normal_cdf(lo) <= normal_cdf(hi) + 1e-12);
            }

            #[test]
            fn prop_normal_cdf_stays_in_unit_interval(z in -50.0f64..50.0) {
                let value = normal_cdf(z);
                prop_assert!((0.0..=1.0).contains(&value));
            }

            #[test]
            fn prop_hours_until_target_never_negative(
                p in 0.01f64..=1.0,
                target in 0.01f64..=1.0,
            ) {
                prop_assert!(hours_until_target_retention(p, target, 0.0005) >= 0.0);
            }

            #[test]
            fn prop_retention_never_exceeds_accuracy(p in 0.0f64..=1.0, hours in 0.0f64..10_000.0) {
                prop_assert!(exponential_retention(p, hours, 0.0005) <= p);
            }
        }
    }
}
