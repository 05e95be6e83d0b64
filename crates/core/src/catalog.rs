use std::borrow::Cow;
use std::collections::HashMap;

use thiserror::Error;

use crate::config::{ConfigError, ExamConfig};
use crate::model::{
    ListeningQuestion, Part, Question, QuestionId, ReadingBlockQuestion, ReadingSingleQuestion,
    Section, SubQuestion,
};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("question {id} is outside 1..={total}")]
    OutOfRange { id: QuestionId, total: u32 },

    #[error("question {id} is defined more than once")]
    DuplicateId { id: QuestionId },

    #[error("reading block {id} has no sub-questions")]
    EmptyBlock { id: QuestionId },

    #[error("reading block {id} must be identified by its first sub-question ({first})")]
    BlockIdMismatch { id: QuestionId, first: QuestionId },

    #[error("reading block {id} is not contiguous at sub-question {at}")]
    NonContiguousBlock { id: QuestionId, at: QuestionId },

    #[error("question {id} is a {section} question but sits outside the {section} range")]
    SectionMismatch { id: QuestionId, section: Section },

    #[error("question {id} has no options")]
    NoOptions { id: QuestionId },
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Lookup of question content by sequential id.
///
/// Every id resolves: ids inside a reading block resolve to the block, and ids
/// the configured set does not define resolve to a synthesized placeholder.
#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    config: ExamConfig,
    questions: Vec<Question>,
    index: HashMap<QuestionId, usize>,
}

impl QuestionCatalog {
    /// Builds a catalog after checking the question set against `config`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the config is invalid, an id is out of range or
    /// duplicated, a block is empty or not contiguous, or a question sits in the
    /// wrong section.
    pub fn new(config: ExamConfig, questions: Vec<Question>) -> Result<Self, CatalogError> {
        config.validate()?;

        let mut index = HashMap::new();
        for (pos, question) in questions.iter().enumerate() {
            validate_shape(&config, question)?;
            for id in question.question_ids() {
                if !config.is_in_range(id) {
                    return Err(CatalogError::OutOfRange {
                        id,
                        total: config.total_questions,
                    });
                }
                if index.insert(id, pos).is_some() {
                    return Err(CatalogError::DuplicateId { id });
                }
            }
        }

        Ok(Self {
            config,
            questions,
            index,
        })
    }

    /// A catalog with no configured questions; every lookup falls back.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Config` if `config` is invalid.
    pub fn empty(config: ExamConfig) -> Result<Self, CatalogError> {
        Self::new(config, Vec::new())
    }

    /// A complete demo set covering every id of `config`.
    ///
    /// Parts 6 and 7 are grouped into blocks of four and three sub-questions.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Config` if `config` is invalid.
    pub fn sample(config: ExamConfig) -> Result<Self, CatalogError> {
        config.validate()?;
        let questions = sample_questions(&config);
        Self::new(config, questions)
    }

    #[must_use]
    pub fn config(&self) -> &ExamConfig {
        &self.config
    }

    /// Configured questions in source order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The configured question covering `id`, without falling back.
    #[must_use]
    pub fn resolve(&self, id: QuestionId) -> Option<&Question> {
        self.index
            .get(&id)
            .and_then(|pos| self.questions.get(*pos))
    }

    /// Content for `id`; synthesizes a reading placeholder when nothing matches.
    #[must_use]
    pub fn get_question_data(&self, id: QuestionId) -> Cow<'_, Question> {
        match self.resolve(id) {
            Some(question) => Cow::Borrowed(question),
            None => Cow::Owned(Question::ReadingSingle(ReadingSingleQuestion::placeholder(id))),
        }
    }

    /// The reading block containing `id`, if any.
    #[must_use]
    pub fn block_of(&self, id: QuestionId) -> Option<&ReadingBlockQuestion> {
        self.resolve(id).and_then(Question::as_block)
    }

    #[must_use]
    pub fn is_block_member(&self, id: QuestionId) -> bool {
        self.block_of(id).is_some()
    }

    /// Navigator label derived from the fixed part range table.
    #[must_use]
    pub fn get_part_tooltip(&self, id: QuestionId) -> String {
        Part::for_question(id).tooltip()
    }

    #[must_use]
    pub fn is_listening_question(&self, id: QuestionId) -> bool {
        self.config.is_listening_question(id)
    }

    #[must_use]
    pub fn is_reading_question(&self, id: QuestionId) -> bool {
        self.config.is_reading_question(id)
    }

    /// Correct option for `id`, when the set ships an answer key.
    #[must_use]
    pub fn answer_key(&self, id: QuestionId) -> Option<u8> {
        self.resolve(id).and_then(|q| q.answer_key_for(id))
    }
}

fn validate_shape(config: &ExamConfig, question: &Question) -> Result<(), CatalogError> {
    let id = question.id();
    match question {
        Question::Listening(q) => {
            if q.options.is_empty() {
                return Err(CatalogError::NoOptions { id });
            }
            if !config.is_listening_question(id) {
                return Err(CatalogError::SectionMismatch {
                    id,
                    section: Section::Listening,
                });
            }
        }
        Question::ReadingSingle(q) => {
            if q.options.is_empty() {
                return Err(CatalogError::NoOptions { id });
            }
            if config.is_listening_question(id) {
                return Err(CatalogError::SectionMismatch {
                    id,
                    section: Section::Reading,
                });
            }
        }
        Question::ReadingBlock(block) => {
            let Some(first) = block.questions.first() else {
                return Err(CatalogError::EmptyBlock { id });
            };
            if first.id != block.id {
                return Err(CatalogError::BlockIdMismatch { id, first: first.id });
            }
            for pair in block.questions.windows(2) {
                if pair[1].id != pair[0].id.next() {
                    return Err(CatalogError::NonContiguousBlock { id, at: pair[1].id });
                }
            }
            for sub in &block.questions {
                if sub.options.is_empty() {
                    return Err(CatalogError::NoOptions { id: sub.id });
                }
                if !config.is_reading_question(sub.id) {
                    return Err(CatalogError::SectionMismatch {
                        id: sub.id,
                        section: Section::Reading,
                    });
                }
            }
        }
    }
    Ok(())
}

fn letter_options(count: u8) -> Vec<String> {
    (0..count)
        .map(|i| format!("({})", char::from(b'A' + i)))
        .collect()
}

fn sample_key(id: u32, options: u8) -> Option<u8> {
    u8::try_from(id % u32::from(options)).ok()
}

fn sample_questions(config: &ExamConfig) -> Vec<Question> {
    let mut out = Vec::new();

    for raw in 1..=config.listening_questions {
        let id = QuestionId::new(raw);
        let part = Part::for_question(id);
        let options = if part == Part::Part2 { 3 } else { 4 };
        out.push(Question::Listening(ListeningQuestion {
            id,
            part,
            image_ref: (part == Part::Part1).then(|| format!("images/q{raw:03}.jpg")),
            audio_ref: format!("audio/q{raw:03}.mp3"),
            options: letter_options(options),
            answer_key: sample_key(raw, options),
        }));
    }

    let mut raw = config.reading_start;
    while raw <= config.total_questions {
        let id = QuestionId::new(raw);
        let part = Part::for_question(id);
        let block_size = match part {
            Part::Part6 => 4,
            Part::Part7 => 3,
            _ => 1,
        };

        if block_size == 1 {
            out.push(Question::ReadingSingle(ReadingSingleQuestion {
                id,
                part,
                prompt: format!("Choose the word that best completes sentence {raw}."),
                options: letter_options(4),
                answer_key: sample_key(raw, 4),
            }));
            raw += 1;
            continue;
        }

        let mut end = raw;
        while end - raw + 1 < block_size
            && end < config.total_questions
            && Part::for_question(QuestionId::new(end + 1)) == part
        {
            end += 1;
        }
        out.push(Question::ReadingBlock(ReadingBlockQuestion {
            id,
            part,
            passage: format!("Read the text for questions {raw}-{end}."),
            questions: (raw..=end)
                .map(|sub| SubQuestion {
                    id: QuestionId::new(sub),
                    text: format!("Question {sub}"),
                    options: letter_options(4),
                    answer_key: sample_key(sub, 4),
                })
                .collect(),
        }));
        raw = end + 1;
    }

    out
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionKind;

    fn single(id: u32) -> Question {
        Question::ReadingSingle(ReadingSingleQuestion {
            id: QuestionId::new(id),
            part: Part::for_question(QuestionId::new(id)),
            prompt: "p".into(),
            options: vec!["a".into(), "b".into()],
            answer_key: None,
        })
    }

    fn block(ids: &[u32]) -> Question {
        Question::ReadingBlock(ReadingBlockQuestion {
            id: QuestionId::new(ids[0]),
            part: Part::Part6,
            passage: "passage".into(),
            questions: ids
                .iter()
                .map(|id| SubQuestion {
                    id: QuestionId::new(*id),
                    text: "t".into(),
                    options: vec!["a".into()],
                    answer_key: None,
                })
                .collect(),
        })
    }

    #[test]
    fn sample_covers_every_id() {
        let catalog = QuestionCatalog::sample(ExamConfig::default()).unwrap();
        for raw in 1..=200 {
            let id = QuestionId::new(raw);
            let question = catalog.resolve(id).expect("sample defines every id");
            assert!(question.covers(id));
        }
        assert_eq!(catalog.block_of(QuestionId::new(133)).unwrap().first_id(), QuestionId::new(131));
        assert_eq!(catalog.block_of(QuestionId::new(146)).unwrap().first_id(), QuestionId::new(143));
        assert_eq!(catalog.block_of(QuestionId::new(200)).unwrap().last_id(), QuestionId::new(200));
        assert!(catalog.block_of(QuestionId::new(120)).is_none());
    }

    #[test]
    fn sub_ids_resolve_to_their_block() {
        let catalog =
            QuestionCatalog::new(ExamConfig::default(), vec![block(&[131, 132, 133])]).unwrap();
        let question = catalog.get_question_data(QuestionId::new(132));
        assert_eq!(question.kind(), QuestionKind::ReadingBlock);
        assert_eq!(question.id(), QuestionId::new(131));
    }

    #[test]
    fn unknown_ids_fall_back_to_reading_single() {
        let catalog = QuestionCatalog::empty(ExamConfig::default()).unwrap();
        for (raw, part) in [(3, Part::Part1), (50, Part::Part3), (120, Part::Part5), (190, Part::Part7)]
        {
            let question = catalog.get_question_data(QuestionId::new(raw));
            assert!(matches!(question, Cow::Owned(_)));
            assert_eq!(question.kind(), QuestionKind::ReadingSingle);
            assert_eq!(question.part(), part);
            assert_eq!(question.id(), QuestionId::new(raw));
        }
    }

    #[test]
    fn tooltip_uses_range_table() {
        let catalog = QuestionCatalog::empty(ExamConfig::default()).unwrap();
        assert_eq!(catalog.get_part_tooltip(QuestionId::new(7)), "Part 2: Question-Response");
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = QuestionCatalog::new(ExamConfig::default(), vec![single(120), block(&[119, 120])])
            .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateId { id: QuestionId::new(120) });
    }

    #[test]
    fn rejects_gapped_block() {
        let err =
            QuestionCatalog::new(ExamConfig::default(), vec![block(&[131, 133])]).unwrap_err();
        assert!(matches!(err, CatalogError::NonContiguousBlock { .. }));
    }

    #[test]
    fn rejects_reading_question_in_listening_range() {
        let err = QuestionCatalog::new(ExamConfig::default(), vec![single(12)]).unwrap_err();
        assert!(matches!(err, CatalogError::SectionMismatch { .. }));
    }

    #[test]
    fn rejects_out_of_range_ids() {
        let err = QuestionCatalog::new(ExamConfig::default(), vec![single(201)]).unwrap_err();
        assert!(matches!(err, CatalogError::OutOfRange { total: 200, .. }));
    }

    #[test]
    fn sample_respects_small_configs() {
        let config = ExamConfig {
            total_questions: 20,
            listening_questions: 10,
            reading_start: 11,
            ..ExamConfig::default()
        };
        let catalog = QuestionCatalog::sample(config).unwrap();
        assert_eq!(catalog.questions().len(), 20);
    }
}
