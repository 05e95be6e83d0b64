use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::answer::AnswerLedger;
use crate::model::ids::ExamSessionId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("submitted_at is before started_at")]
    InvalidTimeRange,

    #[error("unknown submit reason: {0}")]
    UnknownReason(String),
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitReason {
    /// The candidate confirmed the submit dialog.
    Confirmed,
    /// The overall timer ran out.
    TimeExpired,
}

impl SubmitReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SubmitReason::Confirmed => "confirmed",
            SubmitReason::TimeExpired => "time_expired",
        }
    }
}

impl fmt::Display for SubmitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmitReason {
    type Err = AttemptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(SubmitReason::Confirmed),
            "time_expired" => Ok(SubmitReason::TimeExpired),
            other => Err(AttemptError::UnknownReason(other.to_string())),
        }
    }
}

/// Final record of a completed session, handed to result submission once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamAttempt {
    session_id: ExamSessionId,
    started_at: DateTime<Utc>,
    submitted_at: DateTime<Utc>,
    reason: SubmitReason,
    time_remaining_secs: u32,
    answers: AnswerLedger,
}

impl ExamAttempt {
    /// # Errors
    ///
    /// Returns `AttemptError::InvalidTimeRange` if `submitted_at` is before `started_at`.
    pub fn new(
        session_id: ExamSessionId,
        started_at: DateTime<Utc>,
        submitted_at: DateTime<Utc>,
        reason: SubmitReason,
        time_remaining_secs: u32,
        answers: AnswerLedger,
    ) -> Result<Self, AttemptError> {
        if submitted_at < started_at {
            return Err(AttemptError::InvalidTimeRange);
        }
        Ok(Self {
            session_id,
            started_at,
            submitted_at,
            reason,
            time_remaining_secs,
            answers,
        })
    }

    #[must_use]
    pub fn session_id(&self) -> ExamSessionId {
        self.session_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    #[must_use]
    pub fn reason(&self) -> SubmitReason {
        self.reason
    }

    #[must_use]
    pub fn time_remaining_secs(&self) -> u32 {
        self.time_remaining_secs
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerLedger {
        &self.answers
    }
}
