//! Navigation legality for the listening lock and reading blocks.

use exam_core::QuestionCatalog;
use exam_core::model::{QuestionId, Section};
use thiserror::Error;

/// Why a handler left the session unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Rejection {
    #[error("the session is already completed")]
    Completed,
    #[error("the session was torn down")]
    TornDown,
    #[error("manual navigation is locked during the listening section")]
    ListeningLocked,
    #[error("question {id} is outside the exam")]
    OutOfRange { id: QuestionId },
    #[error("question {id} belongs to the locked listening section")]
    LockedListeningQuestion { id: QuestionId },
    #[error("already at the first reading question")]
    AtReadingStart,
    #[error("already at the last question")]
    AtLastQuestion,
    #[error("audio events only apply during the listening section")]
    NotListening,
    #[error("an advance or section transition is already pending")]
    AdvancePending,
    #[error("no submission is awaiting confirmation")]
    NoSubmitPending,
}

/// Result of a controller handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// The current question changed.
    Moved { from: QuestionId, to: QuestionId },
    /// The handler took effect without moving.
    Applied,
    /// Nothing changed.
    Rejected(Rejection),
}

impl NavOutcome {
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, NavOutcome::Rejected(_))
    }

    #[must_use]
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            NavOutcome::Rejected(reason) => Some(*reason),
            NavOutcome::Moved { .. } | NavOutcome::Applied => None,
        }
    }
}

/// Computes manual navigation targets for one section.
///
/// Every manual move is rejected while `section` is listening. In reading,
/// targets never fall before the reading start and always land on the first
/// sub-question of a block.
#[derive(Debug, Clone, Copy)]
pub struct NavigationGuard<'a> {
    catalog: &'a QuestionCatalog,
    section: Section,
}

impl<'a> NavigationGuard<'a> {
    #[must_use]
    pub fn new(catalog: &'a QuestionCatalog, section: Section) -> Self {
        Self { catalog, section }
    }

    /// Target of a direct jump to `id`.
    ///
    /// # Errors
    ///
    /// Rejects while listening, for ids outside the exam, and for ids before
    /// the reading start.
    pub fn go_to(&self, id: QuestionId) -> Result<QuestionId, Rejection> {
        self.ensure_unlocked()?;
        let config = self.catalog.config();
        if !config.is_in_range(id) {
            return Err(Rejection::OutOfRange { id });
        }
        if id < config.reading_start_id() {
            return Err(Rejection::LockedListeningQuestion { id });
        }
        Ok(self.normalize(id))
    }

    /// Target of `next` from `current`; a block is skipped as a whole.
    ///
    /// # Errors
    ///
    /// Rejects while listening and when the step would pass the last question.
    pub fn next(&self, current: QuestionId) -> Result<QuestionId, Rejection> {
        self.ensure_unlocked()?;
        let step_from = self
            .catalog
            .block_of(current)
            .map_or(current, |block| block.last_id());
        let target = step_from.next();
        if !self.catalog.config().is_in_range(target) || target == step_from {
            return Err(Rejection::AtLastQuestion);
        }
        Ok(self.normalize(target))
    }

    /// Target of `prev` from `current`; a block is skipped as a whole.
    ///
    /// # Errors
    ///
    /// Rejects while listening and when the step would fall before the
    /// reading start.
    pub fn prev(&self, current: QuestionId) -> Result<QuestionId, Rejection> {
        self.ensure_unlocked()?;
        let step_from = self
            .catalog
            .block_of(current)
            .map_or(current, |block| block.first_id());
        let target = step_from.prev();
        if target < self.catalog.config().reading_start_id() || target == step_from {
            return Err(Rejection::AtReadingStart);
        }
        Ok(self.normalize(target))
    }

    /// The id a view should display for `id`: the first sub-question when
    /// `id` sits inside a block, otherwise `id` itself.
    #[must_use]
    pub fn normalize(&self, id: QuestionId) -> QuestionId {
        normalize(self.catalog, id)
    }

    fn ensure_unlocked(&self) -> Result<(), Rejection> {
        match self.section {
            Section::Listening => Err(Rejection::ListeningLocked),
            Section::Reading => Ok(()),
        }
    }
}

pub(crate) fn normalize(catalog: &QuestionCatalog, id: QuestionId) -> QuestionId {
    catalog.block_of(id).map_or(id, |block| block.first_id())
}
