use exam_core::model::ExamAttempt;

use super::SqliteRepository;
use super::mapping::{answers_to_json, i64_from_usize, map_attempt_row, map_attempt_row_with_id};
use crate::repository::{AttemptRepository, AttemptRow, StorageError};

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

#[async_trait::async_trait]
impl AttemptRepository for SqliteRepository {
    async fn append_attempt(&self, attempt: &ExamAttempt) -> Result<i64, StorageError> {
        let answers = attempt.answers();
        let res = sqlx::query(
            r"
                INSERT INTO exam_attempts (
                    session_id, started_at, submitted_at, reason, time_remaining_secs,
                    total_questions, answered, marked, answers_json
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
        )
        .bind(attempt.session_id().to_string())
        .bind(attempt.started_at())
        .bind(attempt.submitted_at())
        .bind(attempt.reason().as_str())
        .bind(i64::from(attempt.time_remaining_secs()))
        .bind(i64::from(answers.total()))
        .bind(i64_from_usize("answered", answers.answered_count())?)
        .bind(i64_from_usize("marked", answers.marked_count())?)
        .bind(answers_to_json(answers)?)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StorageError::Conflict
            } else {
                StorageError::Connection(e.to_string())
            }
        })?;

        tracing::debug!(
            session_id = %attempt.session_id(),
            id = res.last_insert_rowid(),
            "stored exam attempt"
        );
        Ok(res.last_insert_rowid())
    }

    async fn get_attempt(&self, id: i64) -> Result<ExamAttempt, StorageError> {
        let row = sqlx::query(
            r"
                SELECT
                    session_id, started_at, submitted_at, reason,
                    time_remaining_secs, answers_json
                FROM exam_attempts
                WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .ok_or(StorageError::NotFound)?;

        map_attempt_row(&row)
    }

    async fn list_recent_attempts(&self, limit: u32) -> Result<Vec<AttemptRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    id, session_id, started_at, submitted_at, reason,
                    time_remaining_secs, answers_json
                FROM exam_attempts
                ORDER BY submitted_at DESC, id DESC
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_attempt_row_with_id).collect()
    }
}
