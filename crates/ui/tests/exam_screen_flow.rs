use std::sync::Arc;
use std::time::Duration;

use exam_core::model::QuestionId;
use exam_core::time::fixed_now;
use exam_core::{ExamConfig, QuestionCatalog};
use services::{Clock, ExamSessionService, NavOutcome, Rejection};
use storage::repository::{InMemoryRepository, StaticQuestionSource};
use ui::ViewError;
use ui::vm::{ExamIntent, QuestionPanelVm, map_attempt_history, start_exam};

fn service(config: ExamConfig, questions: Vec<exam_core::model::Question>) -> ExamSessionService {
    ExamSessionService::new(
        Clock::fixed(fixed_now()),
        config,
        Arc::new(StaticQuestionSource::new(questions)),
        Arc::new(InMemoryRepository::new()),
    )
}

#[tokio::test(start_paused = true)]
async fn exam_screen_runs_from_listening_to_results() {
    let config = ExamConfig {
        total_duration_secs: 60,
        listening_duration_secs: 5,
        ..ExamConfig::default()
    };
    let questions = QuestionCatalog::sample(config.clone())
        .unwrap()
        .questions()
        .to_vec();
    let sessions = service(config, questions);
    let mut screen = start_exam(&sessions).await.unwrap();

    let frame = screen.frame();
    assert!(matches!(frame.panel, QuestionPanelVm::Listening { .. }));
    let outcome = screen
        .dispatch(ExamIntent::GoTo(QuestionId::new(40)))
        .await
        .unwrap();
    assert_eq!(outcome, NavOutcome::Rejected(Rejection::ListeningLocked));

    screen
        .dispatch(ExamIntent::Answer {
            id: QuestionId::new(1),
            option: 3,
        })
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_secs(9)).await;
    let frame = screen.frame();
    assert_eq!(frame.header.section_label, "Reading");
    assert_eq!(frame.panel.answerable_ids(), vec![QuestionId::new(101)]);

    screen.dispatch(ExamIntent::Submit).await.unwrap();
    assert!(screen.frame().header.show_confirm_dialog);
    screen.dispatch(ExamIntent::ConfirmSubmit).await.unwrap();

    let result = screen.finish(&sessions).await.unwrap();
    assert_eq!(result.reason_label, "Submitted");
    assert_eq!(result.overall.answered_label, "1/200 answered");
    assert_eq!(result.time_left_label, "00:51");

    assert_eq!(
        screen.dispatch(ExamIntent::Next).await.unwrap_err(),
        ViewError::SessionClosed
    );

    let history = map_attempt_history(&sessions.list_recent_attempts(5).await.unwrap());
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].reason_label, "Submitted");
}

#[tokio::test]
async fn invalid_question_set_is_reported_to_the_view() {
    let config = ExamConfig::default();
    let mut questions = QuestionCatalog::sample(config.clone())
        .unwrap()
        .questions()
        .to_vec();
    questions.reverse();
    questions.push(questions[0].clone());

    let err = start_exam(&service(config, questions)).await.err().unwrap();
    assert_eq!(err, ViewError::InvalidQuestionSet);
}
