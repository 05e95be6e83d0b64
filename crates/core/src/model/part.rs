use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PartError {
    #[error("invalid part number: {0}")]
    InvalidNumber(u8),
}

//
// ─── PART ──────────────────────────────────────────────────────────────────────
//

/// The seven parts of a full test.
///
/// Parts 1-4 are listening, parts 5-7 are reading. The default id ranges are
/// fixed by the test format and do not scale with the configured question count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Part {
    Part1,
    Part2,
    Part3,
    Part4,
    Part5,
    Part6,
    Part7,
}

impl Part {
    pub const ALL: [Part; 7] = [
        Part::Part1,
        Part::Part2,
        Part::Part3,
        Part::Part4,
        Part::Part5,
        Part::Part6,
        Part::Part7,
    ];

    /// Derives the part purely from where the id falls in the range table.
    #[must_use]
    pub fn for_question(id: QuestionId) -> Self {
        match id.value() {
            1..=6 => Part::Part1,
            7..=31 => Part::Part2,
            32..=70 => Part::Part3,
            71..=100 => Part::Part4,
            101..=130 => Part::Part5,
            131..=146 => Part::Part6,
            _ => Part::Part7,
        }
    }

    /// Converts a 1-7 part number.
    ///
    /// # Errors
    ///
    /// Returns `PartError::InvalidNumber` outside 1-7.
    pub fn from_number(value: u8) -> Result<Self, PartError> {
        match value {
            1 => Ok(Part::Part1),
            2 => Ok(Part::Part2),
            3 => Ok(Part::Part3),
            4 => Ok(Part::Part4),
            5 => Ok(Part::Part5),
            6 => Ok(Part::Part6),
            7 => Ok(Part::Part7),
            _ => Err(PartError::InvalidNumber(value)),
        }
    }

    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Part::Part1 => 1,
            Part::Part2 => 2,
            Part::Part3 => 3,
            Part::Part4 => 4,
            Part::Part5 => 5,
            Part::Part6 => 6,
            Part::Part7 => 7,
        }
    }

    #[must_use]
    pub fn is_listening(self) -> bool {
        self.number() <= 4
    }

    /// Short title of the part's task type.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Part::Part1 => "Photographs",
            Part::Part2 => "Question-Response",
            Part::Part3 => "Conversations",
            Part::Part4 => "Talks",
            Part::Part5 => "Incomplete Sentences",
            Part::Part6 => "Text Completion",
            Part::Part7 => "Reading Comprehension",
        }
    }

    /// Label shown when hovering a question in the navigator.
    #[must_use]
    pub fn tooltip(self) -> String {
        format!("Part {}: {}", self.number(), self.title())
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Part {}", self.number())
    }
}

impl TryFrom<u8> for Part {
    type Error = PartError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Part::from_number(value)
    }
}

impl From<Part> for u8 {
    fn from(part: Part) -> Self {
        part.number()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
