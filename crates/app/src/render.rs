//! Table rendering for command output.

use std::collections::BTreeMap;

use comfy_table::{Cell, Table};
use quiz_core::analytics::{
    HistorySummary, PredictionResult, RetentionReport, ScheduleEntry, TopicRetention, Trend,
};
use services::{format_duration, format_interval};

fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

fn since(hours: f64) -> String {
    format!("{} ago", format_duration(hours * 3600.0))
}

pub fn prediction_table(
    prediction: &PredictionResult,
    question_count: u32,
    simulated: Option<f64>,
) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("Historical accuracy"), Cell::new(percent(prediction.accuracy))]);
    table.add_row(vec![
        Cell::new("Predicted correct"),
        Cell::new(format!("{:.1} / {question_count}", prediction.predicted_correct)),
    ]);
    table.add_row(vec![
        Cell::new("Pass probability"),
        Cell::new(format!("{:.1}%", prediction.pass_probability)),
    ]);
    if let Some(simulated) = simulated {
        table.add_row(vec![
            Cell::new("Simulated pass probability"),
            Cell::new(format!("{simulated:.1}%")),
        ]);
    }
    table.add_row(vec![
        Cell::new("Expected duration"),
        Cell::new(format_duration(prediction.predicted_duration_seconds)),
    ]);
    table
}

pub fn retention_table(topics: &[TopicRetention]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Topic",
        "Retention",
        "Accuracy",
        "Sessions",
        "Last review",
        "Next review",
    ]);
    for t in topics {
        table.add_row(vec![
            Cell::new(&t.topic),
            Cell::new(percent(t.retention_rate)),
            Cell::new(percent(t.accuracy)),
            Cell::new(t.exposures),
            Cell::new(since(t.hours_since_review)),
            Cell::new(format_interval(t.hours_until_review)),
        ]);
    }
    table
}

pub fn report_lines(report: &RetentionReport) -> Vec<String> {
    let names = |topics: &[TopicRetention]| {
        if topics.is_empty() {
            "none".to_string()
        } else {
            topics.iter().map(|t| t.topic.as_str()).collect::<Vec<_>>().join(", ")
        }
    };
    vec![
        format!("Overall retention: {}", percent(report.overall_retention)),
        format!("Questions answered: {}", report.total_questions),
        format!("At risk: {}", names(&report.at_risk)),
        format!("Mastered: {}", names(&report.mastered)),
    ]
}

pub fn schedule_table(entries: &[ScheduleEntry]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Topic", "Priority", "Urgency", "Next review", "Retention"]);
    for e in entries {
        table.add_row(vec![
            Cell::new(e.rank),
            Cell::new(&e.retention.topic),
            Cell::new(format!("{:.3}", e.retention.priority_index)),
            Cell::new(e.urgency.label()),
            Cell::new(format_interval(e.retention.hours_until_review)),
            Cell::new(percent(e.retention.retention_rate)),
        ]);
    }
    table
}

pub fn summary_table(summary: &HistorySummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    let rows = [
        ("Sessions", summary.total_sessions.to_string()),
        ("Questions answered", summary.questions_answered.to_string()),
        ("Correct", summary.correct.to_string()),
        ("Incorrect", summary.incorrect.to_string()),
        ("Accuracy", percent(summary.accuracy)),
        ("Average score", format!("{:.1}", summary.average_score)),
        ("Best score", format!("{:.1}", summary.best_score)),
        ("Worst score", format!("{:.1}", summary.worst_score)),
        ("Study time", format_duration(summary.total_study_seconds)),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    table
}

pub fn trends_table(trends: &BTreeMap<String, Trend>) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Topic", "Trend"]);
    for (topic, trend) in trends {
        let label = match trend {
            Trend::Improving => "improving",
            Trend::Stable => "stable",
            Trend::Declining => "declining",
        };
        table.add_row(vec![Cell::new(topic), Cell::new(label)]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(name: &str, hours_until_review: f64) -> TopicRetention {
        TopicRetention {
            topic: name.to_string(),
            retention_rate: 0.42,
            priority_index: 0.5,
            hours_until_review,
            accuracy: 0.5,
            exposures: 2,
            hours_since_review: 1.5,
        }
    }

    #[test]
    fn retention_rows_are_human_readable() {
        let rendered = retention_table(&[topic("Algebra", 0.0), topic("Geometry", 30.0)]).to_string();
        assert!(rendered.contains("Algebra"));
        assert!(rendered.contains("42.0%"));
        assert!(rendered.contains("1h 30m ago"));
        assert!(rendered.contains("Review now"));
        assert!(rendered.contains("1 day"));
    }

    #[test]
    fn report_lines_name_empty_groups() {
        let report = RetentionReport {
            all_topics: vec![topic("Algebra", 0.0)],
            at_risk: vec![topic("Algebra", 0.0)],
            mastered: Vec::new(),
            overall_retention: 0.42,
            total_questions: 10,
        };
        let lines = report_lines(&report);
        assert_eq!(lines[2], "At risk: Algebra");
        assert_eq!(lines[3], "Mastered: none");
    }
}
