//! Question sets stored as JSON arrays of tagged questions.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use exam_core::model::Question;

use crate::repository::{QuestionSource, StorageError};

/// Reads the question set from a JSON file on every load.
#[derive(Debug, Clone)]
pub struct JsonQuestionFile {
    path: PathBuf,
}

impl JsonQuestionFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `questions` as pretty JSON, replacing the file.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if encoding fails, or
    /// `StorageError::Io` if the file cannot be written.
    pub async fn write(&self, questions: &[Question]) -> Result<(), StorageError> {
        let body = serde_json::to_string_pretty(questions)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| StorageError::Io(format!("{}: {e}", self.path.display())))
    }
}

#[async_trait]
impl QuestionSource for JsonQuestionFile {
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound
            } else {
                StorageError::Io(format!("{}: {e}", self.path.display()))
            }
        })?;
        let questions: Vec<Question> = serde_json::from_str(&raw).map_err(|e| {
            StorageError::Serialization(format!("{}: {e}", self.path.display()))
        })?;
        tracing::debug!(path = %self.path.display(), count = questions.len(), "loaded question file");
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::{ExamConfig, QuestionCatalog};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("exam-storage-{}-{name}", std::process::id()))
    }

    #[tokio::test]
    async fn written_sample_loads_back_into_a_valid_catalog() {
        let path = temp_path("sample.json");
        let file = JsonQuestionFile::new(&path);
        let sample = QuestionCatalog::sample(ExamConfig::default()).unwrap();
        file.write(sample.questions()).await.unwrap();

        let loaded = file.load_questions().await.unwrap();
        let catalog = QuestionCatalog::new(ExamConfig::default(), loaded).unwrap();
        assert_eq!(catalog.questions().len(), sample.questions().len());

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let file = JsonQuestionFile::new(temp_path("missing.json"));
        assert!(matches!(file.load_questions().await, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn malformed_file_is_a_serialization_error() {
        let path = temp_path("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = JsonQuestionFile::new(&path).load_questions().await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
        let _ = std::fs::remove_file(path);
    }
}
