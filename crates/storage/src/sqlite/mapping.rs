use exam_core::model::{AnswerLedger, ExamAttempt, ExamSessionId, SubmitReason};
use sqlx::Row;

use crate::repository::{AttemptRow, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn i64_from_usize(field: &'static str, v: usize) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn answers_to_json(answers: &AnswerLedger) -> Result<String, StorageError> {
    serde_json::to_string(answers).map_err(ser)
}

pub(crate) fn map_attempt_row(row: &sqlx::sqlite::SqliteRow) -> Result<ExamAttempt, StorageError> {
    let session_id: ExamSessionId = row
        .try_get::<String, _>("session_id")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    let reason: SubmitReason = row
        .try_get::<String, _>("reason")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    let time_remaining_secs = u32_from_i64(
        "time_remaining_secs",
        row.try_get::<i64, _>("time_remaining_secs").map_err(ser)?,
    )?;
    let answers: AnswerLedger =
        serde_json::from_str(&row.try_get::<String, _>("answers_json").map_err(ser)?)
            .map_err(ser)?;

    ExamAttempt::new(
        session_id,
        row.try_get("started_at").map_err(ser)?,
        row.try_get("submitted_at").map_err(ser)?,
        reason,
        time_remaining_secs,
        answers,
    )
    .map_err(ser)
}

pub(crate) fn map_attempt_row_with_id(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<AttemptRow, StorageError> {
    let id: i64 = row.try_get("id").map_err(ser)?;
    Ok(AttemptRow::new(id, map_attempt_row(row)?))
}
