use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;
use crate::model::part::Part;
use crate::model::section::Section;

/// Labels given to synthesized placeholder questions.
pub const PLACEHOLDER_OPTIONS: [&str; 4] = ["Option A", "Option B", "Option C", "Option D"];

//
// ─── VARIANTS ──────────────────────────────────────────────────────────────────
//

/// An audio-driven question; the audio surface reports when playback ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListeningQuestion {
    pub id: QuestionId,
    pub part: Part,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    pub audio_ref: String,
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_key: Option<u8>,
}

/// A stand-alone reading question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingSingleQuestion {
    pub id: QuestionId,
    pub part: Part,
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_key: Option<u8>,
}

impl ReadingSingleQuestion {
    /// Synthesizes a generic question for an id the configured set does not define.
    #[must_use]
    pub fn placeholder(id: QuestionId) -> Self {
        Self {
            id,
            part: Part::for_question(id),
            prompt: format!("Question {id}"),
            options: PLACEHOLDER_OPTIONS.iter().map(ToString::to_string).collect(),
            answer_key: None,
        }
    }
}

/// One question inside a reading block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubQuestion {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_key: Option<u8>,
}

/// A passage shared by several contiguous sub-questions.
///
/// The block's own id is the id of its first sub-question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingBlockQuestion {
    pub id: QuestionId,
    pub part: Part,
    pub passage: String,
    pub questions: Vec<SubQuestion>,
}

impl ReadingBlockQuestion {
    #[must_use]
    pub fn first_id(&self) -> QuestionId {
        self.questions.first().map_or(self.id, |q| q.id)
    }

    #[must_use]
    pub fn last_id(&self) -> QuestionId {
        self.questions.last().map_or(self.id, |q| q.id)
    }

    #[must_use]
    pub fn contains(&self, id: QuestionId) -> bool {
        self.questions.iter().any(|q| q.id == id)
    }

    pub fn sub_ids(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.questions.iter().map(|q| q.id)
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Discriminant of [`Question`], handy for logging and projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Listening,
    ReadingSingle,
    ReadingBlock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Question {
    Listening(ListeningQuestion),
    ReadingSingle(ReadingSingleQuestion),
    ReadingBlock(ReadingBlockQuestion),
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        match self {
            Question::Listening(q) => q.id,
            Question::ReadingSingle(q) => q.id,
            Question::ReadingBlock(q) => q.id,
        }
    }

    #[must_use]
    pub fn part(&self) -> Part {
        match self {
            Question::Listening(q) => q.part,
            Question::ReadingSingle(q) => q.part,
            Question::ReadingBlock(q) => q.part,
        }
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        match self {
            Question::Listening(_) => QuestionKind::Listening,
            Question::ReadingSingle(_) => QuestionKind::ReadingSingle,
            Question::ReadingBlock(_) => QuestionKind::ReadingBlock,
        }
    }

    #[must_use]
    pub fn section(&self) -> Section {
        match self {
            Question::Listening(_) => Section::Listening,
            Question::ReadingSingle(_) | Question::ReadingBlock(_) => Section::Reading,
        }
    }

    #[must_use]
    pub fn as_block(&self) -> Option<&ReadingBlockQuestion> {
        match self {
            Question::ReadingBlock(block) => Some(block),
            Question::Listening(_) | Question::ReadingSingle(_) => None,
        }
    }

    #[must_use]
    pub fn is_block(&self) -> bool {
        self.as_block().is_some()
    }

    /// Every question id answered through this question, in order.
    #[must_use]
    pub fn question_ids(&self) -> Vec<QuestionId> {
        match self {
            Question::Listening(q) => vec![q.id],
            Question::ReadingSingle(q) => vec![q.id],
            Question::ReadingBlock(block) => block.sub_ids().collect(),
        }
    }

    /// True when `id` is this question's own id or one of its sub-question ids.
    #[must_use]
    pub fn covers(&self, id: QuestionId) -> bool {
        match self {
            Question::Listening(q) => q.id == id,
            Question::ReadingSingle(q) => q.id == id,
            Question::ReadingBlock(block) => block.id == id || block.contains(id),
        }
    }

    /// The correct option for `id`, when the question set ships an answer key.
    #[must_use]
    pub fn answer_key_for(&self, id: QuestionId) -> Option<u8> {
        match self {
            Question::Listening(q) if q.id == id => q.answer_key,
            Question::ReadingSingle(q) if q.id == id => q.answer_key,
            Question::ReadingBlock(block) => block
                .questions
                .iter()
                .find(|q| q.id == id)
                .and_then(|q| q.answer_key),
            Question::Listening(_) | Question::ReadingSingle(_) => None,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> ReadingBlockQuestion {
        ReadingBlockQuestion {
            id: QuestionId::new(131),
            part: Part::Part6,
            passage: "Memo".into(),
            questions: (131..=134)
                .map(|id| SubQuestion {
                    id: QuestionId::new(id),
                    text: format!("Blank {id}"),
                    options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    answer_key: Some(2),
                })
                .collect(),
        }
    }

    #[test]
    fn placeholder_uses_range_table_part() {
        let q = ReadingSingleQuestion::placeholder(QuestionId::new(140));
        assert_eq!(q.part, Part::Part6);
        assert_eq!(q.options.len(), 4);
        assert_eq!(q.prompt, "Question 140");
    }

    #[test]
    fn block_covers_its_sub_ids() {
        let q = Question::ReadingBlock(block());
        assert!(q.covers(QuestionId::new(133)));
        assert!(!q.covers(QuestionId::new(135)));
        assert_eq!(q.question_ids().len(), 4);
        assert_eq!(q.answer_key_for(QuestionId::new(134)), Some(2));
        assert_eq!(q.section(), Section::Reading);
    }

    #[test]
    fn json_shape_is_tagged_by_type() {
        let q = Question::ReadingSingle(ReadingSingleQuestion::placeholder(QuestionId::new(101)));
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["type"], "reading_single");
        assert_eq!(json["part"], 5);

        let back: Question = serde_json::from_value(json).unwrap();
        assert_eq!(back, q);
    }
}
