use std::sync::Arc;

use quiz_core::model::{QuestionDraft, QuestionId, QuizId};
use quiz_core::time::fixed_now;
use services::{Clock, QuizBankService, QuizSessionError, QuizSessionLoop};
use storage::repository::{InMemoryRepository, SessionHistoryProvider};

async fn seeded_bank(repo: &InMemoryRepository) -> QuizId {
    let bank = QuizBankService::new(Clock::fixed(fixed_now()), Arc::new(repo.clone()));
    let quiz_id = QuizId::new(1);
    bank.save_quiz(quiz_id, "Smoke Quiz", None).await.unwrap();

    for (id, topic) in [(1, "Algebra"), (2, "Algebra"), (3, "Geometry")] {
        let draft = QuestionDraft::new(
            quiz_id,
            topic,
            format!("Q{id}"),
            vec!["yes".into(), "no".into()],
            "yes",
        );
        bank.add_question(QuestionId::new(id), draft).await.unwrap();
    }
    quiz_id
}

#[tokio::test]
async fn completed_session_is_persisted_once() {
    let repo = InMemoryRepository::new();
    let quiz_id = seeded_bank(&repo).await;

    let loop_svc = QuizSessionLoop::new(
        Clock::fixed(fixed_now()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    );

    let mut session = loop_svc.start_session(quiz_id, None).await.unwrap();
    let mut last = None;
    let mut answers = ["yes", "no", "yes"].into_iter();
    while !session.is_complete() {
        let answer = answers.next().unwrap();
        last = Some(loop_svc.answer_current(&mut session, answer, 5.0).await.unwrap());
    }

    let result = last.unwrap();
    assert!(result.is_complete);
    let record = result.record.expect("record persisted on completion");
    assert_eq!(record.total_questions(), 3);
    assert_eq!(record.correct_count(), 2);

    let history = repo.list_sessions(Some(quiz_id)).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id(), session.id());

    assert!(matches!(
        loop_svc.finish_session(&mut session).await,
        Err(QuizSessionError::Completed)
    ));
    assert_eq!(repo.list_sessions(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn finishing_early_records_partial_session() {
    let repo = InMemoryRepository::new();
    let quiz_id = seeded_bank(&repo).await;
    let loop_svc = QuizSessionLoop::new(
        Clock::fixed(fixed_now()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    )
    .with_shuffle(true);

    let mut session = loop_svc.start_session(quiz_id, Some(2)).await.unwrap();
    assert_eq!(session.total_questions(), 2);

    let result = loop_svc.answer_current(&mut session, "yes", 3.0).await.unwrap();
    assert!(!result.is_complete);
    assert!(result.record.is_none());

    let record = loop_svc.finish_session(&mut session).await.unwrap();
    assert_eq!(record.total_questions(), 1);
    assert_eq!(repo.list_sessions(Some(quiz_id)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_quiz_cannot_start() {
    let repo = InMemoryRepository::new();
    let loop_svc = QuizSessionLoop::new(
        Clock::fixed(fixed_now()),
        Arc::new(repo.clone()),
        Arc::new(repo),
    );
    assert!(matches!(
        loop_svc.start_session(QuizId::new(42), None).await,
        Err(QuizSessionError::Storage(_))
    ));
}

#[tokio::test]
async fn resaving_a_quiz_keeps_its_creation_time() {
    let repo = InMemoryRepository::new();
    let first = QuizBankService::new(Clock::fixed(fixed_now()), Arc::new(repo.clone()));
    let created = first.save_quiz(QuizId::new(5), "Draft", None).await.unwrap();

    let later = QuizBankService::new(
        Clock::fixed(fixed_now() + chrono::Duration::days(3)),
        Arc::new(repo.clone()),
    );
    let renamed = later
        .save_quiz(QuizId::new(5), "  Final  ", Some("Chapter 1".into()))
        .await
        .unwrap();

    assert_eq!(renamed.name(), "Final");
    assert_eq!(renamed.created_at(), created.created_at());
    let quizzes = later.list_quizzes().await.unwrap();
    assert_eq!(quizzes, [renamed]);
}
