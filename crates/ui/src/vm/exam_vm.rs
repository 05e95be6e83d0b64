use std::sync::Arc;

use exam_core::QuestionCatalog;
use exam_core::model::{QuestionId, Section};
use services::runner::{self, SessionCommand, SessionHandle};
use services::{ExamSessionService, NavOutcome, SessionError, SessionSnapshot};
use tokio::sync::watch;

use crate::state::ViewError;
use crate::vm::navigator_vm::{NavigatorPartVm, map_navigator};
use crate::vm::question_panel_vm::{QuestionPanelVm, map_question_panel};
use crate::vm::result_vm::{ResultVm, map_result};
use crate::vm::time_fmt::format_countdown;

/// Fixed wording of the listening-to-reading notice.
pub const TRANSITION_NOTICE: &str =
    "The listening section has ended. The reading section starts shortly.";

/// Things a candidate can do from the exam screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExamIntent {
    /// Answer the question on screen (or a sub-question of the block on screen).
    Answer { id: QuestionId, option: u8 },
    AudioEnded,
    ToggleMark,
    GoTo(QuestionId),
    Prev,
    Next,
    Submit,
    ConfirmSubmit,
    CancelSubmit,
}

impl From<ExamIntent> for SessionCommand {
    fn from(intent: ExamIntent) -> Self {
        match intent {
            ExamIntent::Answer { id, option } => SessionCommand::Answer { id, option },
            ExamIntent::AudioEnded => SessionCommand::AudioEnded,
            ExamIntent::ToggleMark => SessionCommand::ToggleMark,
            ExamIntent::GoTo(id) => SessionCommand::GoTo(id),
            ExamIntent::Prev => SessionCommand::Prev,
            ExamIntent::Next => SessionCommand::Next,
            ExamIntent::Submit => SessionCommand::RequestSubmit,
            ExamIntent::ConfirmSubmit => SessionCommand::ConfirmSubmit,
            ExamIntent::CancelSubmit => SessionCommand::CancelSubmit,
        }
    }
}

/// Timers, section and dialogs shown above the question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExamHeaderVm {
    pub section_label: &'static str,
    pub total_timer: String,
    /// Only while the listening countdown matters.
    pub listening_timer: Option<String>,
    pub progress_label: String,
    pub notice: Option<&'static str>,
    pub show_confirm_dialog: bool,
    pub can_navigate: bool,
    pub is_completed: bool,
}

#[must_use]
pub fn map_exam_header(snapshot: &SessionSnapshot) -> ExamHeaderVm {
    let listening = snapshot.section == Section::Listening;
    ExamHeaderVm {
        section_label: if listening { "Listening" } else { "Reading" },
        total_timer: format_countdown(snapshot.total_time_remaining_secs),
        listening_timer: listening
            .then(|| format_countdown(snapshot.listening_time_remaining_secs)),
        progress_label: format!(
            "{}/{} answered, {} marked",
            snapshot.progress.answered, snapshot.progress.total, snapshot.progress.marked
        ),
        notice: snapshot.show_transition_notice.then_some(TRANSITION_NOTICE),
        show_confirm_dialog: snapshot.confirm_submit_pending,
        can_navigate: !listening && !snapshot.is_completed,
        is_completed: snapshot.is_completed,
    }
}

/// Everything the exam screen renders for one state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExamFrameVm {
    pub header: ExamHeaderVm,
    pub panel: QuestionPanelVm,
    pub navigator: Vec<NavigatorPartVm>,
}

#[must_use]
pub fn map_exam_frame(catalog: &QuestionCatalog, snapshot: &SessionSnapshot) -> ExamFrameVm {
    ExamFrameVm {
        header: map_exam_header(snapshot),
        panel: map_question_panel(
            catalog,
            &snapshot.answers,
            snapshot.current_question,
            snapshot.audio_ended,
        ),
        navigator: map_navigator(catalog, snapshot),
    }
}

/// A live exam screen backed by a running session.
pub struct ExamSessionVm {
    catalog: Arc<QuestionCatalog>,
    handle: SessionHandle,
}

impl ExamSessionVm {
    #[must_use]
    pub fn new(catalog: Arc<QuestionCatalog>, handle: SessionHandle) -> Self {
        Self { catalog, handle }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.handle.snapshot()
    }

    /// Receiver notified whenever the session publishes a new state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.handle.subscribe()
    }

    #[must_use]
    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn frame(&self) -> ExamFrameVm {
        map_exam_frame(&self.catalog, &self.handle.snapshot())
    }

    /// Forwards `intent`; a rejected intent is a normal outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::SessionClosed` once the session has ended.
    pub async fn dispatch(&self, intent: ExamIntent) -> Result<NavOutcome, ViewError> {
        self.handle
            .send(intent.into())
            .await
            .map_err(|_| ViewError::SessionClosed)
    }

    /// Waits for completion and submits the result once.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::SessionClosed` if the session stopped without
    /// completing, or `ViewError::Unknown` if submission fails.
    pub async fn finish(&mut self, sessions: &ExamSessionService) -> Result<ResultVm, ViewError> {
        let completion = self.handle.completed().await.map_err(|err| match err {
            SessionError::RunnerClosed | SessionError::AlreadyHandedOff => ViewError::SessionClosed,
            _ => ViewError::Unknown,
        })?;
        let submitted = sessions
            .submit(&completion)
            .await
            .map_err(|_| ViewError::Unknown)?;
        Ok(map_result(&submitted))
    }
}

/// # Errors
///
/// Returns `ViewError::InvalidQuestionSet` when the question set cannot be
/// used, or `ViewError::Unknown` for other failures.
pub async fn start_exam(sessions: &ExamSessionService) -> Result<ExamSessionVm, ViewError> {
    let controller = match sessions.start_session().await {
        Ok(controller) => controller,
        Err(SessionError::Catalog(_)) => return Err(ViewError::InvalidQuestionSet),
        Err(_) => return Err(ViewError::Unknown),
    };
    let catalog = Arc::clone(controller.catalog());
    Ok(ExamSessionVm::new(catalog, runner::spawn(controller)))
}
