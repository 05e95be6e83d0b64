use std::sync::Arc;

use chrono::{DateTime, Utc};
use exam_core::model::{ExamAttempt, ExamSessionId, SubmitReason};
use exam_core::{Clock, ExamConfig, ExamResult, QuestionCatalog};
use storage::repository::{AttemptRepository, QuestionSource};
use tracing::info;

use super::controller::{SessionCompletion, SessionController};
use crate::error::SessionError;

/// A stored attempt together with its result summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedAttempt {
    pub id: i64,
    pub attempt: ExamAttempt,
    pub result: ExamResult,
}

/// Attempt history row for list views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptListItem {
    pub id: i64,
    pub session_id: ExamSessionId,
    pub submitted_at: DateTime<Utc>,
    pub reason: SubmitReason,
    pub answered: usize,
    pub total: u32,
    pub time_remaining_secs: u32,
}

/// Orchestrates session start and the one-time result submission.
#[derive(Clone)]
pub struct ExamSessionService {
    clock: Clock,
    config: ExamConfig,
    questions: Arc<dyn QuestionSource>,
    attempts: Arc<dyn AttemptRepository>,
}

impl ExamSessionService {
    #[must_use]
    pub fn new(
        clock: Clock,
        config: ExamConfig,
        questions: Arc<dyn QuestionSource>,
        attempts: Arc<dyn AttemptRepository>,
    ) -> Self {
        Self {
            clock,
            config,
            questions,
            attempts,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ExamConfig {
        &self.config
    }

    /// Loads and validates the question set for the configured exam.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the source fails, or
    /// `SessionError::Catalog` if the set breaks the catalog invariants.
    pub async fn load_catalog(&self) -> Result<QuestionCatalog, SessionError> {
        let questions = self.questions.load_questions().await?;
        Ok(QuestionCatalog::new(self.config.clone(), questions)?)
    }

    /// Start a new session over a freshly loaded question set.
    ///
    /// # Errors
    ///
    /// See [`ExamSessionService::load_catalog`].
    pub async fn start_session(&self) -> Result<SessionController, SessionError> {
        let catalog = Arc::new(self.load_catalog().await?);
        Ok(self.start_with_catalog(catalog))
    }

    /// Start a new session over an already loaded catalog.
    #[must_use]
    pub fn start_with_catalog(&self, catalog: Arc<QuestionCatalog>) -> SessionController {
        SessionController::new(ExamSessionId::generate(), catalog, self.clock.now())
    }

    /// Takes the completion out of `session` and stores it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotCompleted` while the session is running,
    /// `SessionError::AlreadyHandedOff` if the result was already taken, or
    /// storage errors from [`ExamSessionService::submit`].
    pub async fn finalize(
        &self,
        session: &mut SessionController,
    ) -> Result<SubmittedAttempt, SessionError> {
        if !session.is_completed() {
            return Err(SessionError::NotCompleted);
        }
        let completion = session
            .take_completion()
            .ok_or(SessionError::AlreadyHandedOff)?;
        self.submit(&completion).await
    }

    /// Stores a completion. Safe to retry after a storage failure; storing the
    /// same session twice fails with `StorageError::Conflict`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Attempt` for inconsistent timestamps or
    /// `SessionError::Storage` if persistence fails.
    pub async fn submit(
        &self,
        completion: &SessionCompletion,
    ) -> Result<SubmittedAttempt, SessionError> {
        let submitted_at = chrono::Duration::from_std(completion.elapsed)
            .map_or(completion.started_at, |elapsed| completion.started_at + elapsed);
        let attempt = ExamAttempt::new(
            completion.session_id,
            completion.started_at,
            submitted_at,
            completion.reason,
            completion.time_remaining_secs,
            completion.answers.clone(),
        )?;
        let id = self.attempts.append_attempt(&attempt).await?;
        let result = ExamResult::compute(&completion.catalog, &completion.answers);

        info!(
            session_id = %completion.session_id,
            attempt_id = id,
            reason = %completion.reason,
            answered = result.overall().answered,
            correct = result.overall().correct,
            "exam attempt submitted"
        );

        Ok(SubmittedAttempt {
            id,
            attempt,
            result,
        })
    }

    /// Most recent attempts first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the repository fails.
    pub async fn list_recent_attempts(
        &self,
        limit: u32,
    ) -> Result<Vec<AttemptListItem>, SessionError> {
        let rows = self.attempts.list_recent_attempts(limit).await?;
        Ok(rows
            .into_iter()
            .map(|row| AttemptListItem {
                id: row.id,
                session_id: row.attempt.session_id(),
                submitted_at: row.attempt.submitted_at(),
                reason: row.attempt.reason(),
                answered: row.attempt.answers().answered_count(),
                total: row.attempt.answers().total(),
                time_remaining_secs: row.attempt.time_remaining_secs(),
            })
            .collect())
    }

    /// Result summary of a stored attempt against the current question set.
    ///
    /// # Errors
    ///
    /// Returns storage or catalog errors.
    pub async fn attempt_result(&self, id: i64) -> Result<SubmittedAttempt, SessionError> {
        let attempt = self.attempts.get_attempt(id).await?;
        let catalog = self.load_catalog().await?;
        let result = ExamResult::compute(&catalog, attempt.answers());
        Ok(SubmittedAttempt {
            id,
            attempt,
            result,
        })
    }
}
