//! Result summaries computed from a finished ledger.

use std::collections::BTreeMap;

use crate::catalog::QuestionCatalog;
use crate::model::{AnswerLedger, Part, QuestionId, Section};

/// Counts for one section or part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub total: u32,
    pub answered: u32,
    pub marked: u32,
    /// Questions with an answer key available.
    pub keyed: u32,
    pub correct: u32,
}

impl Tally {
    #[must_use]
    pub fn unanswered(&self) -> u32 {
        self.total.saturating_sub(self.answered)
    }

    fn add(&mut self, answered: bool, marked: bool, key: Option<u8>, selected: Option<u8>) {
        self.total += 1;
        self.answered += u32::from(answered);
        self.marked += u32::from(marked);
        if let Some(key) = key {
            self.keyed += 1;
            self.correct += u32::from(selected == Some(key));
        }
    }
}

/// Read-only summary shown once a session is completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamResult {
    pub listening: Tally,
    pub reading: Tally,
    pub by_part: BTreeMap<Part, Tally>,
}

impl ExamResult {
    /// Tallies every id of the exam. Ids between the listening and reading
    /// ranges (if the config leaves a gap) count toward reading.
    #[must_use]
    pub fn compute(catalog: &QuestionCatalog, ledger: &AnswerLedger) -> Self {
        let mut listening = Tally::default();
        let mut reading = Tally::default();
        let mut by_part: BTreeMap<Part, Tally> = BTreeMap::new();

        for (id, answer) in ledger.iter() {
            let key = catalog.answer_key(id);
            let part = catalog
                .resolve(id)
                .map_or_else(|| Part::for_question(id), |q| q.part());
            let section_tally = match section_of(catalog, id) {
                Section::Listening => &mut listening,
                Section::Reading => &mut reading,
            };
            section_tally.add(answer.is_answered(), answer.marked, key, answer.selected);
            by_part
                .entry(part)
                .or_default()
                .add(answer.is_answered(), answer.marked, key, answer.selected);
        }

        Self {
            listening,
            reading,
            by_part,
        }
    }

    #[must_use]
    pub fn overall(&self) -> Tally {
        Tally {
            total: self.listening.total + self.reading.total,
            answered: self.listening.answered + self.reading.answered,
            marked: self.listening.marked + self.reading.marked,
            keyed: self.listening.keyed + self.reading.keyed,
            correct: self.listening.correct + self.reading.correct,
        }
    }
}

fn section_of(catalog: &QuestionCatalog, id: QuestionId) -> Section {
    if catalog.is_listening_question(id) {
        Section::Listening
    } else {
        Section::Reading
    }
}
