use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::model::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("total question count must be > 0")]
    NoQuestions,

    #[error("listening question count ({listening}) must be < total ({total})")]
    ListeningCountTooLarge { listening: u32, total: u32 },

    #[error("reading must start after the last listening question (start {start}, listening {listening})")]
    ReadingStartOverlapsListening { start: u32, listening: u32 },

    #[error("reading start ({start}) must be <= total ({total})")]
    ReadingStartOutOfRange { start: u32, total: u32 },

    #[error("total duration must be > 0 seconds")]
    NoTotalDuration,

    #[error("listening duration ({listening}s) must be <= total duration ({total}s)")]
    ListeningDurationTooLong { listening: u32, total: u32 },

    #[error("invalid value for {key}: {raw}")]
    InvalidValue { key: &'static str, raw: String },
}

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Constants that shape one full-test session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamConfig {
    pub total_questions: u32,
    pub listening_questions: u32,
    pub reading_start: u32,
    pub total_duration_secs: u32,
    pub listening_duration_secs: u32,
    /// Pause between answering a stand-alone reading question and moving on.
    pub answer_advance_delay_ms: u64,
    /// Pause between the end of a listening audio and the next question.
    pub audio_advance_delay_ms: u64,
    /// How long the "listening is over" notice shows before reading starts.
    pub transition_notice_secs: u64,
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self::toeic()
    }
}

impl ExamConfig {
    /// Standard full test: 100 listening + 100 reading questions in two hours.
    #[must_use]
    pub fn toeic() -> Self {
        Self {
            total_questions: 200,
            listening_questions: 100,
            reading_start: 101,
            total_duration_secs: 2 * 60 * 60,
            listening_duration_secs: 45 * 60,
            answer_advance_delay_ms: 500,
            audio_advance_delay_ms: 1_000,
            transition_notice_secs: 3,
        }
    }

    /// Reads `EXAM_*` environment variables over the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when a variable is set but not a number,
    /// or any validation error from [`ExamConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ExamConfig::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// See [`ExamConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        fn read<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            key: &'static str,
            default: T,
        ) -> Result<T, ConfigError> {
            match lookup(key) {
                None => Ok(default),
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue { key, raw }),
            }
        }

        let d = Self::default();
        let config = Self {
            total_questions: read(&lookup, "EXAM_TOTAL_QUESTIONS", d.total_questions)?,
            listening_questions: read(&lookup, "EXAM_LISTENING_QUESTIONS", d.listening_questions)?,
            reading_start: read(&lookup, "EXAM_READING_START", d.reading_start)?,
            total_duration_secs: read(&lookup, "EXAM_TOTAL_SECS", d.total_duration_secs)?,
            listening_duration_secs: read(&lookup, "EXAM_LISTENING_SECS", d.listening_duration_secs)?,
            answer_advance_delay_ms: read(&lookup, "EXAM_ANSWER_ADVANCE_MS", d.answer_advance_delay_ms)?,
            audio_advance_delay_ms: read(&lookup, "EXAM_AUDIO_ADVANCE_MS", d.audio_advance_delay_ms)?,
            transition_notice_secs: read(&lookup, "EXAM_TRANSITION_NOTICE_SECS", d.transition_notice_secs)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that the counts and durations describe a playable exam.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_questions == 0 {
            return Err(ConfigError::NoQuestions);
        }
        if self.listening_questions >= self.total_questions {
            return Err(ConfigError::ListeningCountTooLarge {
                listening: self.listening_questions,
                total: self.total_questions,
            });
        }
        if self.reading_start <= self.listening_questions {
            return Err(ConfigError::ReadingStartOverlapsListening {
                start: self.reading_start,
                listening: self.listening_questions,
            });
        }
        if self.reading_start > self.total_questions {
            return Err(ConfigError::ReadingStartOutOfRange {
                start: self.reading_start,
                total: self.total_questions,
            });
        }
        if self.total_duration_secs == 0 {
            return Err(ConfigError::NoTotalDuration);
        }
        if self.listening_duration_secs > self.total_duration_secs {
            return Err(ConfigError::ListeningDurationTooLong {
                listening: self.listening_duration_secs,
                total: self.total_duration_secs,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn first_question(&self) -> QuestionId {
        QuestionId::new(1)
    }

    #[must_use]
    pub fn last_question(&self) -> QuestionId {
        QuestionId::new(self.total_questions)
    }

    #[must_use]
    pub fn reading_start_id(&self) -> QuestionId {
        QuestionId::new(self.reading_start)
    }

    #[must_use]
    pub fn last_listening_id(&self) -> QuestionId {
        QuestionId::new(self.listening_questions)
    }

    /// `id` in `[1, listening_questions]`.
    #[must_use]
    pub fn is_listening_question(&self, id: QuestionId) -> bool {
        (1..=self.listening_questions).contains(&id.value())
    }

    /// `id` in `[reading_start, total_questions]`.
    #[must_use]
    pub fn is_reading_question(&self, id: QuestionId) -> bool {
        (self.reading_start..=self.total_questions).contains(&id.value())
    }

    /// `id` in `[1, total_questions]`.
    #[must_use]
    pub fn is_in_range(&self, id: QuestionId) -> bool {
        (1..=self.total_questions).contains(&id.value())
    }

    #[must_use]
    pub fn answer_advance_delay(&self) -> Duration {
        Duration::from_millis(self.answer_advance_delay_ms)
    }

    #[must_use]
    pub fn audio_advance_delay(&self) -> Duration {
        Duration::from_millis(self.audio_advance_delay_ms)
    }

    #[must_use]
    pub fn transition_notice(&self) -> Duration {
        Duration::from_secs(self.transition_notice_secs)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_is_valid_full_test() {
        let config = ExamConfig::default();
        config.validate().unwrap();
        assert_eq!(config.total_questions, 200);
        assert!(config.is_listening_question(QuestionId::new(100)));
        assert!(!config.is_listening_question(QuestionId::new(101)));
        assert!(config.is_reading_question(QuestionId::new(101)));
        assert!(!config.is_reading_question(QuestionId::new(201)));
        assert!(!config.is_in_range(QuestionId::new(0)));
    }

    #[test]
    fn env_overrides_defaults() {
        let config = ExamConfig::from_lookup(lookup_from(&[
            ("EXAM_TOTAL_SECS", "600"),
            ("EXAM_LISTENING_SECS", " 120 "),
        ]))
        .unwrap();
        assert_eq!(config.total_duration_secs, 600);
        assert_eq!(config.listening_duration_secs, 120);
        assert_eq!(config.total_questions, 200);
    }

    #[test]
    fn env_rejects_garbage() {
        let err = ExamConfig::from_lookup(lookup_from(&[("EXAM_TOTAL_QUESTIONS", "many")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "EXAM_TOTAL_QUESTIONS",
                ..
            }
        ));
    }

    #[test]
    fn validate_catches_overlapping_sections() {
        let config = ExamConfig {
            reading_start: 100,
            ..ExamConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ReadingStartOverlapsListening { .. })
        ));

        let config = ExamConfig {
            listening_duration_secs: 9_000,
            ..ExamConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ListeningDurationTooLong { .. })
        ));
    }
}
