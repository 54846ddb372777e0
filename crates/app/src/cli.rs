use clap::{Args, Parser, Subcommand};
use quiz_core::analytics::{DEFAULT_DECAY_RATE, DEFAULT_DESIRED_RETENTION};

#[derive(Debug, Parser)]
#[command(name = "quizstat", version, about = "Quiz history analytics")]
pub struct Cli {
    /// SQLite database URL or path
    #[arg(long = "db", env = "QUIZ_DB_URL", default_value = "sqlite://quizstat.sqlite3", global = true)]
    pub db_url: String,

    /// Forgetting-curve decay rate per hour
    #[arg(long, env = "QUIZ_DECAY_RATE", default_value_t = DEFAULT_DECAY_RATE, global = true)]
    pub decay_rate: f64,

    /// Retention level the next review aims for
    #[arg(long, env = "QUIZ_DESIRED_RETENTION", default_value_t = DEFAULT_DESIRED_RETENTION, global = true)]
    pub desired_retention: f64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a demo question bank and a synthetic session history
    Seed {
        #[arg(long, default_value_t = 1)]
        quiz: u64,

        /// Number of sessions to generate
        #[arg(long, default_value_t = 12)]
        sessions: u32,

        /// RNG seed for the generated answers
        #[arg(long, default_value_t = 7)]
        seed: u64,
    },

    /// Predict the outcome of an exam
    Predict {
        #[arg(long)]
        quiz: Option<u64>,

        /// Number of questions on the exam
        #[arg(long)]
        questions: u32,

        /// Correct answers needed to pass
        #[arg(long)]
        passing: u32,

        /// Cross-check with a Monte Carlo run of this many trials
        #[arg(long)]
        simulate: Option<u32>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Per-topic retention, at-risk and mastered topics
    Retention {
        #[arg(long)]
        quiz: Option<u64>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Topics ranked for review
    Schedule {
        #[arg(long)]
        quiz: Option<u64>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Totals over the session history
    Summary {
        #[arg(long)]
        quiz: Option<u64>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Accuracy trend per topic
    Trends {
        #[arg(long)]
        quiz: Option<u64>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Debug, Clone, Copy, Args)]
pub struct OutputArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_predict_with_global_flags() {
        let cli = Cli::try_parse_from([
            "quizstat",
            "predict",
            "--quiz",
            "3",
            "--questions",
            "20",
            "--passing",
            "12",
            "--json",
            "--decay-rate",
            "0.001",
        ])
        .unwrap();

        assert!((cli.decay_rate - 0.001).abs() < f64::EPSILON);
        match cli.command {
            Command::Predict {
                quiz,
                questions,
                passing,
                simulate,
                output,
            } => {
                assert_eq!(quiz, Some(3));
                assert_eq!((questions, passing), (20, 12));
                assert_eq!(simulate, None);
                assert!(output.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn predict_requires_exam_shape() {
        assert!(Cli::try_parse_from(["quizstat", "predict", "--questions", "20"]).is_err());
    }
}
