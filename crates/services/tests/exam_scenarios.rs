use std::sync::Arc;
use std::time::Duration;

use exam_core::model::{ExamSessionId, QuestionId, Section, SubmitReason};
use exam_core::time::fixed_now;
use exam_core::{ExamConfig, QuestionCatalog};
use services::{NavOutcome, Rejection, SessionController};

fn id(value: u32) -> QuestionId {
    QuestionId::new(value)
}

fn session(config: ExamConfig) -> SessionController {
    let catalog = Arc::new(QuestionCatalog::sample(config).unwrap());
    SessionController::new(ExamSessionId::generate(), catalog, fixed_now())
}

fn short_listening() -> ExamConfig {
    ExamConfig {
        total_duration_secs: 600,
        listening_duration_secs: 10,
        ..ExamConfig::default()
    }
}

fn finish_audio(session: &mut SessionController) {
    assert_eq!(session.on_audio_end(), NavOutcome::Applied);
    session.advance(Duration::from_secs(1));
}

#[test]
fn go_to_during_listening_is_rejected() {
    let mut session = session(ExamConfig::default());
    session.advance(Duration::from_secs(5));

    assert_eq!(
        session.go_to_question(id(50)),
        NavOutcome::Rejected(Rejection::ListeningLocked)
    );
    assert_eq!(session.next(), NavOutcome::Rejected(Rejection::ListeningLocked));
    assert_eq!(session.prev(), NavOutcome::Rejected(Rejection::ListeningLocked));
    assert_eq!(session.current_question(), id(1));
}

#[test]
fn listening_timeout_shows_notice_then_locks_into_reading() {
    let mut session = session(short_listening());
    finish_audio(&mut session);
    finish_audio(&mut session);
    assert_eq!(session.current_question(), id(3));

    session.advance(Duration::from_secs(8));
    let snapshot = session.snapshot();
    assert!(snapshot.show_transition_notice);
    assert_eq!(snapshot.section, Section::Listening);
    assert_eq!(snapshot.current_question, id(3));
    assert_eq!(snapshot.listening_time_remaining_secs, 0);

    session.advance(Duration::from_millis(2_999));
    assert_eq!(session.section(), Section::Listening);

    session.advance(Duration::from_millis(1));
    let snapshot = session.snapshot();
    assert!(!snapshot.show_transition_notice);
    assert_eq!(snapshot.section, Section::Reading);
    assert!(snapshot.is_listening_locked);
    assert_eq!(snapshot.current_question, id(101));
}

#[test]
fn last_audio_end_starts_the_transition() {
    let mut session = session(ExamConfig::default());
    for _ in 1..100 {
        finish_audio(&mut session);
    }
    assert_eq!(session.current_question(), id(100));

    finish_audio(&mut session);
    assert!(session.is_transition_notice_visible());
    assert_eq!(session.current_question(), id(100));
    assert_eq!(
        session.on_audio_end(),
        NavOutcome::Rejected(Rejection::AdvancePending)
    );

    session.advance(Duration::from_secs(3));
    assert_eq!(session.section(), Section::Reading);
    assert_eq!(session.current_question(), id(101));
}

#[test]
fn locked_listening_questions_cannot_be_revisited() {
    let mut session = session(short_listening());
    session.advance(Duration::from_secs(13));
    assert_eq!(session.section(), Section::Reading);

    assert_eq!(
        session.go_to_question(id(1)),
        NavOutcome::Rejected(Rejection::LockedListeningQuestion { id: id(1) })
    );
    assert_eq!(session.prev(), NavOutcome::Rejected(Rejection::AtReadingStart));
    assert_eq!(session.current_question(), id(101));

    assert_eq!(
        session.go_to_question(id(120)),
        NavOutcome::Moved {
            from: id(101),
            to: id(120)
        }
    );
}

#[test]
fn single_reading_answers_advance_but_block_answers_do_not() {
    let mut session = session(short_listening());
    session.advance(Duration::from_secs(13));

    assert_eq!(session.on_answer(id(101), 2), NavOutcome::Applied);
    session.advance(Duration::from_millis(499));
    assert_eq!(session.current_question(), id(101));
    session.advance(Duration::from_millis(1));
    assert_eq!(session.current_question(), id(102));

    session.go_to_question(id(131));
    assert_eq!(session.on_answer(id(132), 1), NavOutcome::Applied);
    session.advance(Duration::from_secs(2));
    assert_eq!(session.current_question(), id(131));
    assert_eq!(session.answers().get(id(132)).unwrap().selected, Some(1));

    assert_eq!(
        session.next(),
        NavOutcome::Moved {
            from: id(131),
            to: id(135)
        }
    );
    assert_eq!(
        session.prev(),
        NavOutcome::Moved {
            from: id(135),
            to: id(131)
        }
    );
}

#[test]
fn overall_timeout_completes_without_confirmation() {
    let mut session = session(ExamConfig {
        total_duration_secs: 5,
        listening_duration_secs: 3,
        ..ExamConfig::default()
    });
    session.on_answer(id(1), 0);
    session.advance(Duration::from_secs(5));

    let snapshot = session.snapshot();
    assert!(snapshot.is_completed);
    assert_eq!(snapshot.submit_reason, Some(SubmitReason::TimeExpired));
    assert!(!snapshot.confirm_submit_pending);
    assert!(!snapshot.show_transition_notice);
    assert_eq!(snapshot.total_time_remaining_secs, 0);
    assert_eq!(session.pending_actions(), 0);

    let completion = session.take_completion().expect("completed");
    assert_eq!(completion.reason, SubmitReason::TimeExpired);
    assert_eq!(completion.answers.answered_count(), 1);
}

#[test]
fn overall_expiry_wins_over_listening_expiry() {
    let mut session = session(ExamConfig {
        total_duration_secs: 4,
        listening_duration_secs: 4,
        ..ExamConfig::default()
    });
    session.advance(Duration::from_secs(10));
    assert_eq!(session.submit_reason(), Some(SubmitReason::TimeExpired));
    assert!(!session.is_transition_notice_visible());
    assert_eq!(session.section(), Section::Listening);
}

#[test]
fn manual_submission_needs_confirmation() {
    let mut session = session(ExamConfig::default());
    assert_eq!(
        session.confirm_submit(),
        NavOutcome::Rejected(Rejection::NoSubmitPending)
    );

    session.request_submit();
    assert!(session.snapshot().confirm_submit_pending);
    session.cancel_submit();
    assert!(!session.snapshot().confirm_submit_pending);
    assert!(!session.is_completed());

    session.request_submit();
    assert_eq!(session.confirm_submit(), NavOutcome::Applied);
    assert_eq!(session.submit_reason(), Some(SubmitReason::Confirmed));

    let remaining = session.total_time_remaining_secs();
    session.advance(Duration::from_secs(30));
    assert_eq!(session.total_time_remaining_secs(), remaining);
    assert_eq!(
        session.on_answer(id(2), 1),
        NavOutcome::Rejected(Rejection::Completed)
    );
    assert_eq!(session.on_mark_toggle(), NavOutcome::Rejected(Rejection::Completed));
}

#[test]
fn snapshot_reports_progress() {
    let mut session = session(ExamConfig::default());
    session.on_answer(id(1), 0);
    session.on_mark_toggle();

    let progress = session.snapshot().progress;
    assert_eq!(progress.total, 200);
    assert_eq!(progress.answered, 1);
    assert_eq!(progress.marked, 1);
    assert_eq!(progress.remaining, 199);
}
