use std::sync::Arc;

use exam_core::ExamConfig;
use storage::repository::{QuestionSource, Storage};

use crate::Clock;
use crate::error::AppServicesError;
use crate::exam::ExamSessionService;

/// Assembles app-facing services around one storage backend.
#[derive(Clone)]
pub struct AppServices {
    config: ExamConfig,
    storage: Storage,
    exam_sessions: Arc<ExamSessionService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the config is invalid or storage
    /// initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: ExamConfig,
        questions: Arc<dyn QuestionSource>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::with_storage(storage, clock, config, questions)
    }

    /// Build services over in-memory storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Config` if the config is invalid.
    pub fn in_memory(
        clock: Clock,
        config: ExamConfig,
        questions: Arc<dyn QuestionSource>,
    ) -> Result<Self, AppServicesError> {
        Self::with_storage(Storage::in_memory(), clock, config, questions)
    }

    fn with_storage(
        storage: Storage,
        clock: Clock,
        config: ExamConfig,
        questions: Arc<dyn QuestionSource>,
    ) -> Result<Self, AppServicesError> {
        config.validate()?;
        let exam_sessions = Arc::new(ExamSessionService::new(
            clock,
            config.clone(),
            questions,
            Arc::clone(&storage.attempts),
        ));
        Ok(Self {
            config,
            storage,
            exam_sessions,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ExamConfig {
        &self.config
    }

    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    #[must_use]
    pub fn exam_sessions(&self) -> Arc<ExamSessionService> {
        Arc::clone(&self.exam_sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::ConfigError;
    use storage::StaticQuestionSource;

    #[test]
    fn rejects_inconsistent_config() {
        let config = ExamConfig {
            listening_duration_secs: 9_000,
            ..ExamConfig::default()
        };
        let err = AppServices::in_memory(
            Clock::default(),
            config,
            Arc::new(StaticQuestionSource::default()),
        )
        .err()
        .expect("config rejected");
        assert!(matches!(
            err,
            AppServicesError::Config(ConfigError::ListeningDurationTooLong { .. })
        ));
    }
}
