//! Drives a [`SessionController`] on real tokio timers.

use exam_core::model::QuestionId;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{Instrument, debug, info_span};

use crate::error::SessionError;
use crate::exam::{NavOutcome, SessionCompletion, SessionController, SessionSnapshot};

const COMMAND_BUFFER: usize = 32;

/// A view action forwarded to the running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Answer { id: QuestionId, option: u8 },
    AudioEnded,
    ToggleMark,
    GoTo(QuestionId),
    Prev,
    Next,
    RequestSubmit,
    ConfirmSubmit,
    CancelSubmit,
}

type CommandEnvelope = (SessionCommand, oneshot::Sender<NavOutcome>);

/// Owner-side handle of a running session.
///
/// Dropping the handle aborts the task, which tears the session down.
pub struct SessionHandle {
    commands: mpsc::Sender<CommandEnvelope>,
    snapshots: watch::Receiver<SessionSnapshot>,
    completion: Option<oneshot::Receiver<SessionCompletion>>,
    task: JoinHandle<()>,
}

/// Spawns `controller` onto the current tokio runtime.
///
/// Session time starts when this is called.
#[must_use]
pub fn spawn(controller: SessionController) -> SessionHandle {
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());
    let (completion_tx, completion_rx) = oneshot::channel();

    let span = info_span!("exam_session", session_id = %controller.session_id());
    let task = tokio::spawn(
        run(controller, command_rx, snapshot_tx, completion_tx).instrument(span),
    );

    SessionHandle {
        commands: command_tx,
        snapshots: snapshot_rx,
        completion: Some(completion_rx),
        task,
    }
}

async fn run(
    mut controller: SessionController,
    mut commands: mpsc::Receiver<CommandEnvelope>,
    snapshots: watch::Sender<SessionSnapshot>,
    completion: oneshot::Sender<SessionCompletion>,
) {
    let origin = Instant::now();

    loop {
        let Some(next_event) = controller.next_event_at() else {
            break;
        };

        tokio::select! {
            received = commands.recv() => {
                let Some((command, reply)) = received else {
                    debug!("command channel closed");
                    controller.teardown();
                    break;
                };
                controller.advance_to(origin.elapsed());
                let outcome = apply(&mut controller, command);
                let _ = reply.send(outcome);
            }
            () = tokio::time::sleep_until(origin + next_event) => {
                controller.advance_to(next_event.max(origin.elapsed()));
            }
        }

        snapshots.send_replace(controller.snapshot());

        if let Some(done) = controller.take_completion() {
            let _ = completion.send(done);
            break;
        }
    }
}

fn apply(controller: &mut SessionController, command: SessionCommand) -> NavOutcome {
    match command {
        SessionCommand::Answer { id, option } => controller.on_answer(id, option),
        SessionCommand::AudioEnded => controller.on_audio_end(),
        SessionCommand::ToggleMark => controller.on_mark_toggle(),
        SessionCommand::GoTo(id) => controller.go_to_question(id),
        SessionCommand::Prev => controller.prev(),
        SessionCommand::Next => controller.next(),
        SessionCommand::RequestSubmit => controller.request_submit(),
        SessionCommand::ConfirmSubmit => controller.confirm_submit(),
        SessionCommand::CancelSubmit => controller.cancel_submit(),
    }
}

impl SessionHandle {
    /// Sends `command` and waits for the controller's verdict.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::RunnerClosed` once the session task has ended.
    pub async fn send(&self, command: SessionCommand) -> Result<NavOutcome, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send((command, reply_tx))
            .await
            .map_err(|_| SessionError::RunnerClosed)?;
        reply_rx.await.map_err(|_| SessionError::RunnerClosed)
    }

    /// Latest published state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that is notified on every published state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Waits until the session completes and takes its result.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyHandedOff` on a second call, or
    /// `SessionError::RunnerClosed` if the task ended without completing.
    pub async fn completed(&mut self) -> Result<SessionCompletion, SessionError> {
        let receiver = self
            .completion
            .take()
            .ok_or(SessionError::AlreadyHandedOff)?;
        receiver.await.map_err(|_| SessionError::RunnerClosed)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
