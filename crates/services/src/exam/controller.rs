use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use exam_core::QuestionCatalog;
use exam_core::model::{AnswerLedger, ExamSessionId, Question, QuestionId, Section, SubmitReason};
use tracing::{debug, info, warn};

use super::deferred::{DeferredAction, DeferredKind, DeferredQueue};
use super::navigation::{NavOutcome, NavigationGuard, Rejection, normalize};
use super::section_clock::{SectionClock, TickOutcome};
use super::snapshot::{SessionProgress, SessionSnapshot};

const TICK: Duration = Duration::from_secs(1);

//
// ─── COMPLETION ────────────────────────────────────────────────────────────────
//

/// Final state of a session, handed off exactly once for submission.
#[derive(Debug, Clone)]
pub struct SessionCompletion {
    pub session_id: ExamSessionId,
    pub started_at: DateTime<Utc>,
    /// Session time elapsed when the session completed.
    pub elapsed: Duration,
    pub reason: SubmitReason,
    pub time_remaining_secs: u32,
    pub answers: AnswerLedger,
    pub catalog: Arc<QuestionCatalog>,
}

#[derive(Debug, Clone, Copy)]
struct Completed {
    reason: SubmitReason,
    at: Duration,
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Owns one full-test session: countdowns, answers, navigation and pacing.
///
/// Time only moves through [`SessionController::advance`], which fires the
/// one-second ticks and any due deferred actions in chronological order.
/// Handlers never block; pacing delays become deferred actions owned by the
/// session and are dropped on completion or teardown.
#[derive(Debug)]
pub struct SessionController {
    session_id: ExamSessionId,
    started_at: DateTime<Utc>,
    catalog: Arc<QuestionCatalog>,
    answers: AnswerLedger,
    current: QuestionId,
    section: Section,
    listening_locked: bool,
    clock: SectionClock,
    deferred: DeferredQueue,
    elapsed: Duration,
    next_tick: Duration,
    show_transition_notice: bool,
    audio_ended: bool,
    confirm_pending: bool,
    completed: Option<Completed>,
    completion_taken: bool,
    torn_down: bool,
}

impl SessionController {
    /// Starts a session at question 1 in the listening section.
    ///
    /// Without listening questions the session opens directly in reading.
    /// Without listening time the transition notice starts immediately.
    #[must_use]
    pub fn new(
        session_id: ExamSessionId,
        catalog: Arc<QuestionCatalog>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let config = catalog.config().clone();
        let mut controller = Self {
            session_id,
            started_at,
            answers: AnswerLedger::new(config.total_questions),
            current: config.first_question(),
            section: Section::Listening,
            listening_locked: false,
            clock: SectionClock::new(config.total_duration_secs, config.listening_duration_secs),
            deferred: DeferredQueue::new(),
            elapsed: Duration::ZERO,
            next_tick: TICK,
            show_transition_notice: false,
            audio_ended: false,
            confirm_pending: false,
            completed: None,
            completion_taken: false,
            torn_down: false,
            catalog,
        };

        if config.listening_questions == 0 {
            controller.enter_reading();
        } else if config.listening_duration_secs == 0 {
            controller.begin_transition();
        }

        info!(
            session_id = %controller.session_id,
            total_questions = config.total_questions,
            listening_questions = config.listening_questions,
            total_secs = config.total_duration_secs,
            "exam session started"
        );
        controller
    }

    // ─── accessors ──────────────────────────────────────────────────────────

    #[must_use]
    pub fn session_id(&self) -> ExamSessionId {
        self.session_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<QuestionCatalog> {
        &self.catalog
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerLedger {
        &self.answers
    }

    #[must_use]
    pub fn current_question(&self) -> QuestionId {
        self.current
    }

    /// Content shown for the current question.
    #[must_use]
    pub fn current_question_data(&self) -> Cow<'_, Question> {
        self.catalog.get_question_data(self.current)
    }

    #[must_use]
    pub fn section(&self) -> Section {
        self.section
    }

    #[must_use]
    pub fn is_listening_locked(&self) -> bool {
        self.listening_locked
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed.is_some()
    }

    #[must_use]
    pub fn submit_reason(&self) -> Option<SubmitReason> {
        self.completed.map(|c| c.reason)
    }

    /// Session time consumed so far.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub fn total_time_remaining_secs(&self) -> u32 {
        self.clock.total_remaining_secs()
    }

    #[must_use]
    pub fn listening_time_remaining_secs(&self) -> u32 {
        self.clock.listening_remaining_secs()
    }

    #[must_use]
    pub fn is_transition_notice_visible(&self) -> bool {
        self.show_transition_notice
    }

    #[must_use]
    pub fn is_audio_ended(&self) -> bool {
        self.audio_ended
    }

    #[must_use]
    pub fn is_submit_confirmation_pending(&self) -> bool {
        self.confirm_pending
    }

    /// Number of deferred actions still waiting.
    #[must_use]
    pub fn pending_actions(&self) -> usize {
        self.deferred.len()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.answers.len().saturating_sub(1);
        let answered = self.answers.answered_count();
        SessionProgress {
            total,
            answered,
            marked: self.answers.marked_count(),
            remaining: total.saturating_sub(answered),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id,
            current_question: self.current,
            section: self.section,
            is_listening_locked: self.listening_locked,
            is_completed: self.is_completed(),
            submit_reason: self.submit_reason(),
            total_time_remaining_secs: self.clock.total_remaining_secs(),
            listening_time_remaining_secs: self.clock.listening_remaining_secs(),
            show_transition_notice: self.show_transition_notice,
            audio_ended: self.audio_ended,
            confirm_submit_pending: self.confirm_pending,
            progress: self.progress(),
            answers: self.answers.clone(),
        }
    }

    // ─── time ───────────────────────────────────────────────────────────────

    /// Moves session time forward by `elapsed`.
    ///
    /// Ticks and deferred actions falling inside the window run in order; a
    /// tick runs before a deferred action due at the same instant.
    pub fn advance(&mut self, elapsed: Duration) {
        let target = self.elapsed.saturating_add(elapsed);
        while self.is_running() {
            let tick_first = self.deferred.next_due().is_none_or(|due| self.next_tick <= due);
            let at = if tick_first {
                self.next_tick
            } else {
                match self.deferred.next_due() {
                    Some(due) => due,
                    None => break,
                }
            };
            if at > target {
                break;
            }
            self.elapsed = self.elapsed.max(at);

            if tick_first {
                self.next_tick += TICK;
                self.on_tick();
            } else if let Some(action) = self.deferred.pop_due(at) {
                self.run_deferred(action);
            }
        }
        if self.is_running() {
            self.elapsed = target;
        }
    }

    /// Moves session time forward to the absolute point `at`.
    pub fn advance_to(&mut self, at: Duration) {
        self.advance(at.saturating_sub(self.elapsed));
    }

    /// Session time of the next tick or deferred action, if any remain.
    #[must_use]
    pub fn next_event_at(&self) -> Option<Duration> {
        if !self.is_running() {
            return None;
        }
        Some(
            self.deferred
                .next_due()
                .map_or(self.next_tick, |due| due.min(self.next_tick)),
        )
    }

    // ─── handlers ───────────────────────────────────────────────────────────

    /// Records `option` for `id`. In reading, answering a stand-alone question
    /// schedules an advance; block sub-questions never advance.
    pub fn on_answer(&mut self, id: QuestionId, option: u8) -> NavOutcome {
        if let Err(reason) = self.ensure_running() {
            return self.reject("answer", reason);
        }
        if self.listening_locked && id < self.catalog.config().reading_start_id() {
            return self.reject("answer", Rejection::LockedListeningQuestion { id });
        }
        if self.answers.record_answer(id, option).is_err() {
            return self.reject("answer", Rejection::OutOfRange { id });
        }
        debug!(session_id = %self.session_id, question = %id, option, "answer recorded");

        if self.section == Section::Reading
            && id == self.current
            && !self.catalog.is_block_member(id)
        {
            self.deferred.cancel(DeferredKind::AnswerAdvance);
            let due = self.due_in(self.catalog.config().answer_advance_delay());
            self.deferred
                .schedule(due, DeferredAction::AdvanceAfterAnswer { from: id });
            debug!(session_id = %self.session_id, question = %id, "answer advance scheduled");
        }
        NavOutcome::Applied
    }

    /// The audio of the current listening question finished playing.
    pub fn on_audio_end(&mut self) -> NavOutcome {
        if let Err(reason) = self.ensure_running() {
            return self.reject("audio_end", reason);
        }
        if self.section != Section::Listening {
            return self.reject("audio_end", Rejection::NotListening);
        }
        if self.deferred.is_pending(DeferredKind::AudioAdvance)
            || self.deferred.is_pending(DeferredKind::Transition)
        {
            return self.reject("audio_end", Rejection::AdvancePending);
        }

        self.audio_ended = true;
        let due = self.due_in(self.catalog.config().audio_advance_delay());
        self.deferred.schedule(
            due,
            DeferredAction::AdvanceAfterAudio { from: self.current },
        );
        debug!(session_id = %self.session_id, question = %self.current, "audio advance scheduled");
        NavOutcome::Applied
    }

    /// Flips the review mark of the current question. For a block, every
    /// sub-question takes the negation of the first sub-question's mark.
    pub fn on_mark_toggle(&mut self) -> NavOutcome {
        if let Err(reason) = self.ensure_running() {
            return self.reject("mark", reason);
        }
        let toggled = match self.catalog.block_of(self.current) {
            Some(block) => {
                let ids: Vec<QuestionId> = block.sub_ids().collect();
                self.answers.toggle_mark_group(&ids)
            }
            None => self.answers.toggle_mark(self.current),
        };
        match toggled {
            Ok(marked) => {
                debug!(session_id = %self.session_id, question = %self.current, marked, "mark toggled");
                NavOutcome::Applied
            }
            Err(_) => self.reject("mark", Rejection::OutOfRange { id: self.current }),
        }
    }

    pub fn go_to_question(&mut self, id: QuestionId) -> NavOutcome {
        if let Err(reason) = self.ensure_running() {
            return self.reject("go_to", reason);
        }
        let target = NavigationGuard::new(&self.catalog, self.section).go_to(id);
        self.manual_move("go_to", target)
    }

    pub fn next(&mut self) -> NavOutcome {
        if let Err(reason) = self.ensure_running() {
            return self.reject("next", reason);
        }
        let target = NavigationGuard::new(&self.catalog, self.section).next(self.current);
        self.manual_move("next", target)
    }

    pub fn prev(&mut self) -> NavOutcome {
        if let Err(reason) = self.ensure_running() {
            return self.reject("prev", reason);
        }
        let target = NavigationGuard::new(&self.catalog, self.section).prev(self.current);
        self.manual_move("prev", target)
    }

    /// Opens the confirmation step; nothing is submitted yet.
    pub fn request_submit(&mut self) -> NavOutcome {
        if let Err(reason) = self.ensure_running() {
            return self.reject("request_submit", reason);
        }
        self.confirm_pending = true;
        NavOutcome::Applied
    }

    pub fn confirm_submit(&mut self) -> NavOutcome {
        if let Err(reason) = self.ensure_running() {
            return self.reject("confirm_submit", reason);
        }
        if !self.confirm_pending {
            return self.reject("confirm_submit", Rejection::NoSubmitPending);
        }
        self.complete(SubmitReason::Confirmed);
        NavOutcome::Applied
    }

    pub fn cancel_submit(&mut self) -> NavOutcome {
        if let Err(reason) = self.ensure_running() {
            return self.reject("cancel_submit", reason);
        }
        if !self.confirm_pending {
            return self.reject("cancel_submit", Rejection::NoSubmitPending);
        }
        self.confirm_pending = false;
        NavOutcome::Applied
    }

    /// Hands off the completed session. Returns `None` before completion and
    /// on every call after the first.
    pub fn take_completion(&mut self) -> Option<SessionCompletion> {
        let completed = self.completed?;
        if self.completion_taken {
            return None;
        }
        self.completion_taken = true;
        Some(SessionCompletion {
            session_id: self.session_id,
            started_at: self.started_at,
            elapsed: completed.at,
            reason: completed.reason,
            time_remaining_secs: self.clock.total_remaining_secs(),
            answers: self.answers.clone(),
            catalog: Arc::clone(&self.catalog),
        })
    }

    /// Stops the timers and drops pending actions of an abandoned session.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        let dropped = self.deferred.len();
        self.deferred.clear();
        self.clock.stop();
        info!(session_id = %self.session_id, dropped, "exam session torn down");
    }

    // ─── internals ──────────────────────────────────────────────────────────

    fn is_running(&self) -> bool {
        self.completed.is_none() && !self.torn_down
    }

    fn ensure_running(&self) -> Result<(), Rejection> {
        if self.completed.is_some() {
            Err(Rejection::Completed)
        } else if self.torn_down {
            Err(Rejection::TornDown)
        } else {
            Ok(())
        }
    }

    /// Session time `delay` from now; saturates instead of overflowing.
    fn due_in(&self, delay: Duration) -> Duration {
        self.elapsed.saturating_add(delay)
    }

    fn reject(&self, action: &'static str, reason: Rejection) -> NavOutcome {
        warn!(
            session_id = %self.session_id,
            action,
            current = %self.current,
            %reason,
            "handler rejected"
        );
        NavOutcome::Rejected(reason)
    }

    fn manual_move(
        &mut self,
        action: &'static str,
        target: Result<QuestionId, Rejection>,
    ) -> NavOutcome {
        match target {
            Ok(to) => {
                self.deferred.cancel(DeferredKind::AnswerAdvance);
                self.move_to(to)
            }
            Err(reason) => self.reject(action, reason),
        }
    }

    fn move_to(&mut self, to: QuestionId) -> NavOutcome {
        let from = self.current;
        if from == to {
            return NavOutcome::Applied;
        }
        self.current = to;
        NavOutcome::Moved { from, to }
    }

    fn on_tick(&mut self) {
        match self.clock.tick() {
            TickOutcome::Running => {}
            TickOutcome::ListeningExpired => {
                info!(session_id = %self.session_id, current = %self.current, "listening time expired");
                self.begin_transition();
            }
            TickOutcome::TimeExpired => self.complete(SubmitReason::TimeExpired),
        }
    }

    fn run_deferred(&mut self, action: DeferredAction) {
        debug!(session_id = %self.session_id, ?action, "deferred action due");
        match action {
            DeferredAction::AdvanceAfterAnswer { from } => {
                if self.section != Section::Reading || self.current != from {
                    return;
                }
                if let Ok(to) = NavigationGuard::new(&self.catalog, self.section).next(from) {
                    self.move_to(to);
                }
            }
            DeferredAction::AdvanceAfterAudio { from } => {
                self.audio_ended = false;
                if self.section != Section::Listening || self.current != from {
                    return;
                }
                if from < self.catalog.config().last_listening_id() {
                    self.move_to(from.next());
                } else {
                    self.begin_transition();
                }
            }
            DeferredAction::EnterReading => self.enter_reading(),
        }
    }

    fn begin_transition(&mut self) {
        if self.section == Section::Reading || self.deferred.is_pending(DeferredKind::Transition) {
            return;
        }
        self.deferred.cancel(DeferredKind::AudioAdvance);
        self.audio_ended = false;
        self.clock.stop_listening();
        self.show_transition_notice = true;
        let due = self.due_in(self.catalog.config().transition_notice());
        self.deferred.schedule(due, DeferredAction::EnterReading);
        info!(session_id = %self.session_id, "listening section over, transition notice shown");
    }

    fn enter_reading(&mut self) {
        let reading_start = self.catalog.config().reading_start_id();
        self.show_transition_notice = false;
        self.audio_ended = false;
        self.clock.stop_listening();
        self.section = Section::Reading;
        self.listening_locked = true;
        self.current = normalize(&self.catalog, reading_start);
        info!(session_id = %self.session_id, current = %self.current, "reading section started");
    }

    fn complete(&mut self, reason: SubmitReason) {
        self.completed = Some(Completed {
            reason,
            at: self.elapsed,
        });
        self.deferred.clear();
        self.clock.stop();
        self.confirm_pending = false;
        self.show_transition_notice = false;
        self.audio_ended = false;
        info!(
            session_id = %self.session_id,
            %reason,
            answered = self.answers.answered_count(),
            time_remaining_secs = self.clock.total_remaining_secs(),
            "exam session completed"
        );
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if self.is_running() {
            self.teardown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::ExamConfig;
    use exam_core::time::fixed_now;

    fn id(value: u32) -> QuestionId {
        QuestionId::new(value)
    }

    fn controller(config: ExamConfig) -> SessionController {
        let catalog = QuestionCatalog::sample(config).unwrap();
        SessionController::new(ExamSessionId::generate(), Arc::new(catalog), fixed_now())
    }

    /// Default exam whose listening section ends after one second.
    fn reading_controller() -> SessionController {
        let mut session = controller(ExamConfig {
            listening_duration_secs: 1,
            ..ExamConfig::default()
        });
        session.advance(Duration::from_secs(4));
        assert_eq!(session.section(), Section::Reading);
        session
    }

    #[test]
    fn countdowns_follow_session_time() {
        let mut session = controller(ExamConfig::default());
        session.advance(Duration::from_millis(10_500));
        assert_eq!(session.total_time_remaining_secs(), 7_190);
        assert_eq!(session.listening_time_remaining_secs(), 2_690);
        assert_eq!(session.elapsed(), Duration::from_millis(10_500));
        assert_eq!(session.next_event_at(), Some(Duration::from_secs(11)));
    }

    #[test]
    fn newer_answer_replaces_pending_advance() {
        let mut session = reading_controller();
        session.on_answer(id(101), 0);
        session.advance(Duration::from_millis(300));
        session.on_answer(id(101), 2);
        session.advance(Duration::from_millis(300));
        assert_eq!(session.current_question(), id(101));
        assert_eq!(session.pending_actions(), 1);

        session.advance(Duration::from_millis(200));
        assert_eq!(session.current_question(), id(102));
        assert_eq!(session.answers().get(id(101)).unwrap().selected, Some(2));
    }

    #[test]
    fn manual_move_cancels_pending_answer_advance() {
        let mut session = reading_controller();
        session.on_answer(id(101), 1);
        assert_eq!(
            session.next(),
            NavOutcome::Moved {
                from: id(101),
                to: id(102)
            }
        );
        session.advance(Duration::from_secs(1));
        assert_eq!(session.current_question(), id(102));
    }

    #[test]
    fn audio_end_is_ignored_while_an_advance_is_pending() {
        let mut session = controller(ExamConfig::default());
        assert_eq!(session.on_audio_end(), NavOutcome::Applied);
        assert!(session.is_audio_ended());
        assert_eq!(
            session.on_audio_end(),
            NavOutcome::Rejected(Rejection::AdvancePending)
        );

        session.advance(Duration::from_secs(1));
        assert_eq!(session.current_question(), id(2));
        assert!(!session.is_audio_ended());
    }

    #[test]
    fn audio_end_outside_listening_is_rejected() {
        let mut session = reading_controller();
        assert_eq!(
            session.on_audio_end(),
            NavOutcome::Rejected(Rejection::NotListening)
        );
    }

    #[test]
    fn block_mark_toggle_covers_every_sub_question() {
        let mut session = reading_controller();
        session.go_to_question(id(133));
        assert_eq!(session.current_question(), id(131));

        session.on_mark_toggle();
        assert!((131..=134).all(|raw| session.answers().get(id(raw)).unwrap().marked));
        assert!(!session.answers().get(id(135)).unwrap().marked);

        session.on_mark_toggle();
        assert_eq!(session.answers().marked_count(), 0);
    }

    #[test]
    fn teardown_drops_pending_actions_and_freezes_time() {
        let mut session = reading_controller();
        session.on_answer(id(101), 3);
        let remaining = session.total_time_remaining_secs();

        session.teardown();
        assert_eq!(session.pending_actions(), 0);
        assert_eq!(session.next_event_at(), None);

        session.advance(Duration::from_secs(5));
        assert_eq!(session.current_question(), id(101));
        assert_eq!(session.total_time_remaining_secs(), remaining);
        assert_eq!(
            session.go_to_question(id(150)),
            NavOutcome::Rejected(Rejection::TornDown)
        );
        assert!(session.take_completion().is_none());
    }

    #[test]
    fn answers_to_locked_listening_questions_are_rejected() {
        let mut session = reading_controller();
        assert_eq!(
            session.on_answer(id(12), 1),
            NavOutcome::Rejected(Rejection::LockedListeningQuestion { id: id(12) })
        );
        assert!(!session.answers().get(id(12)).unwrap().is_answered());
        assert_eq!(
            session.on_answer(id(250), 1),
            NavOutcome::Rejected(Rejection::OutOfRange { id: id(250) })
        );
    }

    #[test]
    fn ids_between_sections_are_locked_for_answers_and_navigation() {
        let config = ExamConfig {
            reading_start: 105,
            listening_duration_secs: 1,
            ..ExamConfig::default()
        };
        let catalog = QuestionCatalog::empty(config).unwrap();
        let mut session =
            SessionController::new(ExamSessionId::generate(), Arc::new(catalog), fixed_now());
        session.advance(Duration::from_secs(4));
        assert_eq!(session.current_question(), id(105));

        let locked = NavOutcome::Rejected(Rejection::LockedListeningQuestion { id: id(103) });
        assert_eq!(session.on_answer(id(103), 0), locked);
        assert_eq!(session.go_to_question(id(103)), locked);
        assert!(!session.answers().get(id(103)).unwrap().is_answered());
    }

    #[test]
    fn answering_another_question_keeps_the_current_advance() {
        let mut session = reading_controller();
        session.on_answer(id(101), 0);
        session.advance(Duration::from_millis(300));
        assert_eq!(session.on_answer(id(120), 1), NavOutcome::Applied);
        assert_eq!(session.pending_actions(), 1);

        session.advance(Duration::from_millis(200));
        assert_eq!(session.current_question(), id(102));
        assert_eq!(session.answers().get(id(120)).unwrap().selected, Some(1));
    }

    #[test]
    fn huge_pacing_delays_never_fire_and_never_overflow() {
        let mut session = controller(ExamConfig {
            listening_duration_secs: 2,
            transition_notice_secs: u64::MAX,
            audio_advance_delay_ms: u64::MAX,
            ..ExamConfig::default()
        });
        assert_eq!(session.on_audio_end(), NavOutcome::Applied);

        session.advance(Duration::from_secs(3));
        assert!(session.is_transition_notice_visible());
        assert_eq!(session.section(), Section::Listening);
        assert_eq!(session.next_event_at(), Some(Duration::from_secs(4)));

        let mut session = controller(ExamConfig {
            listening_duration_secs: 1,
            answer_advance_delay_ms: u64::MAX,
            ..ExamConfig::default()
        });
        session.advance(Duration::from_secs(4));
        assert_eq!(session.on_answer(id(101), 2), NavOutcome::Applied);
        session.advance(Duration::from_secs(60));
        assert_eq!(session.current_question(), id(101));
    }

    #[test]
    fn exam_without_listening_questions_opens_in_reading() {
        let config = ExamConfig {
            total_questions: 20,
            listening_questions: 0,
            reading_start: 1,
            ..ExamConfig::default()
        };
        let catalog = QuestionCatalog::empty(config).unwrap();
        let session = SessionController::new(ExamSessionId::generate(), Arc::new(catalog), fixed_now());
        assert_eq!(session.section(), Section::Reading);
        assert_eq!(session.current_question(), id(1));
        assert!(session.is_listening_locked());
    }

    #[test]
    fn completion_is_handed_off_once() {
        let mut session = reading_controller();
        session.on_answer(id(101), 1);
        session.request_submit();
        session.confirm_submit();

        let completion = session.take_completion().expect("completed");
        assert_eq!(completion.reason, SubmitReason::Confirmed);
        assert_eq!(completion.elapsed, Duration::from_secs(4));
        assert_eq!(completion.answers.answered_count(), 1);
        assert!(session.take_completion().is_none());
        assert_eq!(session.pending_actions(), 0);
    }
}
