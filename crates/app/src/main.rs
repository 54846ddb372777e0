use clap::Parser;
use quiz_core::analytics::{AnalyticsConfig, ExamParameters};
use quiz_core::model::QuizId;
use services::{AppServices, Clock};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod db;
mod render;

use cli::{Cli, Command};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = AnalyticsConfig::try_new(cli.decay_rate, cli.desired_retention)?;

    // Open + migrate SQLite at startup; services stay storage-agnostic.
    let db_url = db::normalize_sqlite_url(&cli.db_url)?;
    db::prepare_sqlite_file(&db_url)?;
    let clock = Clock::system();
    let services = AppServices::new_sqlite(&db_url, clock, config).await?;
    debug!(%db_url, ?config, "storage ready");

    match cli.command {
        Command::Seed {
            quiz,
            sessions,
            seed,
        } => {
            let outcome =
                commands::seed_demo(&services, QuizId::new(quiz), sessions, seed, clock.now())
                    .await?;
            println!(
                "Seeded quiz {quiz}: {} questions, {} sessions",
                outcome.questions, outcome.sessions
            );
            Ok(())
        }
        Command::Predict {
            quiz,
            questions,
            passing,
            simulate,
            output,
        } => {
            let exam = ExamParameters::try_new(questions, passing)?;
            commands::predict(&services, quiz.map(QuizId::new), exam, simulate, output).await
        }
        Command::Retention { quiz, output } => {
            commands::retention(&services, quiz.map(QuizId::new), output).await
        }
        Command::Schedule { quiz, output } => {
            commands::schedule(&services, quiz.map(QuizId::new), output).await
        }
        Command::Summary { quiz, output } => {
            commands::summary(&services, quiz.map(QuizId::new), output).await
        }
        Command::Trends { quiz, output } => {
            commands::trends(&services, quiz.map(QuizId::new), output).await
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
