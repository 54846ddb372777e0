//! Human-readable durations for CLI and UI output.

/// Format seconds as `45s`, `2m 5s`, `3m`, `1h 3m` or `2h`.
///
/// Fractions of a second are truncated; negative input is treated as zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };

    if total < 60 {
        return format!("{total}s");
    }

    let minutes = total / 60;
    let secs = total % 60;
    if minutes < 60 {
        return if secs > 0 {
            format!("{minutes}m {secs}s")
        } else {
            format!("{minutes}m")
        };
    }

    let hours = minutes / 60;
    let mins = minutes % 60;
    if mins > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{hours}h")
    }
}

/// Format hours until a review as `Review now`, `30 minutes`, `5 hours` or `2 days`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_interval(hours: f64) -> String {
    if hours.is_nan() || hours <= 0.0 {
        return "Review now".to_string();
    }

    let (count, unit) = if hours < 1.0 {
        ((hours * 60.0) as u64, "minute")
    } else if hours < 24.0 {
        (hours as u64, "hour")
    } else {
        ((hours / 24.0) as u64, "day")
    };

    let plural = if count == 1 { "" } else { "s" };
    format!("{count} {unit}{plural}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration(45.9), "45s");
        assert_eq!(format_duration(-3.0), "0s");
        assert_eq!(format_duration(125.0), "2m 5s");
        assert_eq!(format_duration(180.0), "3m");
        assert_eq!(format_duration(3_780.0), "1h 3m");
        assert_eq!(format_duration(7_200.0), "2h");
    }

    #[test]
    fn intervals() {
        assert_eq!(format_interval(0.0), "Review now");
        assert_eq!(format_interval(-1.0), "Review now");
        assert_eq!(format_interval(0.5), "30 minutes");
        assert_eq!(format_interval(0.02), "1 minute");
        assert_eq!(format_interval(1.5), "1 hour");
        assert_eq!(format_interval(5.0), "5 hours");
        assert_eq!(format_interval(49.0), "2 days");
        assert_eq!(format_interval(24.0), "1 day");
    }
}
