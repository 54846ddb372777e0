use std::error::Error;

use comfy_table::Table;
use quiz_core::analytics::ExamParameters;
use quiz_core::model::QuizId;
use serde_json::json;
use services::{AnalyticsServiceError, AppServices};

use crate::cli::OutputArgs;
use crate::render;

mod seed;

pub use seed::seed_demo;

const EMPTY_HISTORY: &str = "No sessions recorded yet. Run `quizstat seed` or take a quiz first.";

fn emit<T: serde::Serialize>(
    output: OutputArgs,
    value: &T,
    tables: impl FnOnce() -> Vec<Table>,
) -> Result<(), Box<dyn Error>> {
    if output.json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        for table in tables() {
            println!("{table}");
        }
    }
    Ok(())
}

/// Empty history is an empty state, not a failure.
fn empty_or<T>(result: Result<T, AnalyticsServiceError>) -> Result<Option<T>, Box<dyn Error>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_insufficient_data() => {
            eprintln!("{EMPTY_HISTORY}");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn predict(
    services: &AppServices,
    quiz: Option<QuizId>,
    exam: ExamParameters,
    simulate: Option<u32>,
    output: OutputArgs,
) -> Result<(), Box<dyn Error>> {
    let analytics = services.analytics();
    let Some(prediction) = empty_or(analytics.predict(quiz, &exam).await)? else {
        return Ok(());
    };

    let simulated = match simulate {
        Some(trials) => Some(
            analytics
                .simulate_pass_probability(quiz, &exam, trials, &mut rand::rng())
                .await?,
        ),
        None => None,
    };

    let value = json!({
        "exam": exam,
        "prediction": prediction,
        "simulated_pass_probability": simulated,
    });
    emit(output, &value, || {
        vec![
            render::prediction_table(&prediction, exam.question_count(), simulated),
            render::retention_table(&prediction.topic_retention),
        ]
    })
}

pub async fn retention(
    services: &AppServices,
    quiz: Option<QuizId>,
    output: OutputArgs,
) -> Result<(), Box<dyn Error>> {
    let Some(report) = empty_or(services.analytics().retention_report(quiz).await)? else {
        return Ok(());
    };
    if !output.json {
        for line in render::report_lines(&report) {
            println!("{line}");
        }
    }
    emit(output, &report, || vec![render::retention_table(&report.all_topics)])
}

pub async fn schedule(
    services: &AppServices,
    quiz: Option<QuizId>,
    output: OutputArgs,
) -> Result<(), Box<dyn Error>> {
    let Some(entries) = empty_or(services.analytics().study_schedule(quiz).await)? else {
        return Ok(());
    };
    emit(output, &entries, || vec![render::schedule_table(&entries)])
}

pub async fn summary(
    services: &AppServices,
    quiz: Option<QuizId>,
    output: OutputArgs,
) -> Result<(), Box<dyn Error>> {
    let summary = services.analytics().summary(quiz).await?;
    if summary.total_sessions == 0 && !output.json {
        eprintln!("{EMPTY_HISTORY}");
        return Ok(());
    }
    emit(output, &summary, || vec![render::summary_table(&summary)])
}

pub async fn trends(
    services: &AppServices,
    quiz: Option<QuizId>,
    output: OutputArgs,
) -> Result<(), Box<dyn Error>> {
    let trends = services.analytics().topic_trends(quiz).await?;
    if trends.is_empty() && !output.json {
        eprintln!("{EMPTY_HISTORY}");
        return Ok(());
    }
    emit(output, &trends, || vec![render::trends_table(&trends)])
}
