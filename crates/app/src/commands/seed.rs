use std::error::Error;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use quiz_core::model::{QuestionDraft, QuestionId, QuizId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use services::{AppServices, QuizSession};
use tracing::info;

/// (topic, prompt, alternatives, correct answer)
const DEMO_QUESTIONS: &[(&str, &str, &[&str], &str)] = &[
    ("Algebra", "Solve 2x + 3 = 11", &["x = 3", "x = 4", "x = 7"], "x = 4"),
    ("Algebra", "Expand (a + b)^2", &["a^2 + b^2", "a^2 + 2ab + b^2", "2a + 2b"], "a^2 + 2ab + b^2"),
    ("Algebra", "Roots of x^2 - 9", &["3 and -3", "9 and -9", "3 only"], "3 and -3"),
    ("Geometry", "Interior angles of a triangle sum to", &["90°", "180°", "360°"], "180°"),
    ("Geometry", "Area of a circle with radius r", &["2πr", "πr^2", "πd"], "πr^2"),
    ("Geometry", "A square has how many symmetry axes", &["2", "4", "8"], "4"),
    ("History", "Year the Berlin Wall fell", &["1987", "1989", "1991"], "1989"),
    ("History", "First emperor of Rome", &["Julius Caesar", "Augustus", "Nero"], "Augustus"),
    ("Biology", "Powerhouse of the cell", &["Nucleus", "Ribosome", "Mitochondrion"], "Mitochondrion"),
    ("Biology", "DNA bases pair A with", &["C", "G", "T"], "T"),
];

/// Starting accuracy and per-session drift for each demo topic.
fn topic_skill(topic: &str, session_index: u32) -> f64 {
    let (base, drift) = match topic {
        "Algebra" => (0.45, 0.04),
        "Geometry" => (0.85, 0.0),
        "History" => (0.7, -0.04),
        _ => (0.6, 0.01),
    };
    (base + drift * f64::from(session_index)).clamp(0.05, 0.98)
}

/// Demo question IDs are `quiz * 1000 + n`, so seeded banks never collide.
fn demo_question_id(quiz_id: QuizId, offset: u64) -> Option<QuestionId> {
    quiz_id
        .value()
        .checked_mul(1000)
        .and_then(|base| base.checked_add(offset))
        .map(QuestionId::new)
}

#[derive(Debug)]
pub struct QuizIdTooLarge(pub QuizId);

impl fmt::Display for QuizIdTooLarge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "quiz id {} is too large for demo question ids", self.0)
    }
}

impl Error for QuizIdTooLarge {}

#[derive(Debug)]
pub struct SeedOutcome {
    pub questions: usize,
    pub sessions: u32,
}

/// Create the demo quiz bank and `sessions` synthetic sessions ending before `now`.
///
/// The generated answers depend only on `seed`.
pub async fn seed_demo(
    services: &AppServices,
    quiz_id: QuizId,
    sessions: u32,
    seed: u64,
    now: DateTime<Utc>,
) -> Result<SeedOutcome, Box<dyn Error>> {
    let ids = (1_u64..)
        .take(DEMO_QUESTIONS.len())
        .map(|offset| demo_question_id(quiz_id, offset))
        .collect::<Option<Vec<_>>>()
        .ok_or(QuizIdTooLarge(quiz_id))?;

    let bank = services.quiz_bank();
    bank.save_quiz(
        quiz_id,
        "Demo quiz",
        Some("Generated by quizstat seed".to_string()),
    )
    .await?;

    for (id, (topic, prompt, alternatives, correct)) in ids.into_iter().zip(DEMO_QUESTIONS) {
        let draft = QuestionDraft::new(
            quiz_id,
            *topic,
            *prompt,
            alternatives.iter().map(|a| (*a).to_string()).collect(),
            *correct,
        );
        bank.add_question(id, draft).await?;
    }
    let questions = bank.list_questions(quiz_id).await?;

    let mut rng = StdRng::seed_from_u64(seed);
    let recorder = services.recorder();
    for index in 0..sessions {
        let started_at = now - Duration::hours(i64::from(sessions - index) * 26);
        let mut order = questions.clone();
        order.shuffle(&mut rng);

        let mut session = QuizSession::new(quiz_id, order, started_at)?;
        let mut elapsed = 0_i64;
        loop {
            let Some(question) = session.current() else {
                break;
            };
            let correct = question.correct_answer().to_string();
            let wrong = question
                .alternatives()
                .iter()
                .find(|a| **a != correct)
                .cloned()
                .unwrap_or_default();
            let skill = topic_skill(question.topic(), index);

            let chosen = if rng.random_bool(skill) { correct } else { wrong };
            let seconds: u32 = rng.random_range(4..=30);
            elapsed += i64::from(seconds);
            session.answer_current(
                &chosen,
                f64::from(seconds),
                started_at + Duration::seconds(elapsed),
            )?;
        }

        let record = session.finish(started_at + Duration::seconds(elapsed))?;
        recorder.append_session(&record).await?;
    }

    info!(quiz_id = %quiz_id, questions = questions.len(), sessions, "seeded demo history");
    Ok(SeedOutcome {
        questions: questions.len(),
        sessions,
    })
}
