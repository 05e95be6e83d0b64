use exam_core::model::{AnswerLedger, ExamSessionId, QuestionId, Section, SubmitReason};
use serde::Serialize;

/// Aggregated answer progress, useful for the navigator header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub marked: usize,
    pub remaining: usize,
}

/// Read-only copy of the session state handed to views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: ExamSessionId,
    pub current_question: QuestionId,
    pub section: Section,
    pub is_listening_locked: bool,
    pub is_completed: bool,
    pub submit_reason: Option<SubmitReason>,
    pub total_time_remaining_secs: u32,
    pub listening_time_remaining_secs: u32,
    pub show_transition_notice: bool,
    pub audio_ended: bool,
    pub confirm_submit_pending: bool,
    pub progress: SessionProgress,
    pub answers: AnswerLedger,
}
