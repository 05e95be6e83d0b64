use async_trait::async_trait;
use exam_core::model::{ExamAttempt, ExamSessionId, Question};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(String),
}

/// A persisted attempt together with its storage id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRow {
    pub id: i64,
    pub attempt: ExamAttempt,
}

impl AttemptRow {
    #[must_use]
    pub fn new(id: i64, attempt: ExamAttempt) -> Self {
        Self { id, attempt }
    }
}

/// Destination for finished attempts.
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Store a finished attempt and return its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if an attempt for the same session is
    /// already stored, or other storage errors.
    async fn append_attempt(&self, attempt: &ExamAttempt) -> Result<i64, StorageError>;

    /// Fetch an attempt by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_attempt(&self, id: i64) -> Result<ExamAttempt, StorageError>;

    /// Most recent attempts first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_recent_attempts(&self, limit: u32) -> Result<Vec<AttemptRow>, StorageError>;
}

/// Supplier of the ordered question set for an exam.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the set cannot be read or decoded.
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError>;
}

/// Question source over a set held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticQuestionSource {
    questions: Vec<Question>,
}

impl StaticQuestionSource {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }
}

#[async_trait]
impl QuestionSource for StaticQuestionSource {
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
        Ok(self.questions.clone())
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    attempts: Arc<Mutex<Vec<ExamAttempt>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn has_session(attempts: &[ExamAttempt], session_id: ExamSessionId) -> bool {
        attempts.iter().any(|a| a.session_id() == session_id)
    }
}

fn row_id(index: usize) -> Result<i64, StorageError> {
    i64::try_from(index + 1).map_err(|_| StorageError::Serialization("attempt id overflow".into()))
}

#[async_trait]
impl AttemptRepository for InMemoryRepository {
    async fn append_attempt(&self, attempt: &ExamAttempt) -> Result<i64, StorageError> {
        let mut guard = self
            .attempts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if Self::has_session(&guard, attempt.session_id()) {
            return Err(StorageError::Conflict);
        }
        guard.push(attempt.clone());
        row_id(guard.len() - 1)
    }

    async fn get_attempt(&self, id: i64) -> Result<ExamAttempt, StorageError> {
        let guard = self
            .attempts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        usize::try_from(id)
            .ok()
            .and_then(|id| id.checked_sub(1))
            .and_then(|idx| guard.get(idx))
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_recent_attempts(&self, limit: u32) -> Result<Vec<AttemptRow>, StorageError> {
        let guard = self
            .attempts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let mut rows = Vec::with_capacity(limit.min(guard.len()));
        for (idx, attempt) in guard.iter().enumerate().rev().take(limit) {
            rows.push(AttemptRow::new(row_id(idx)?, attempt.clone()));
        }
        Ok(rows)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub attempts: Arc<dyn AttemptRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let attempts: Arc<dyn AttemptRepository> = Arc::new(InMemoryRepository::new());
        Self { attempts }
    }
}
