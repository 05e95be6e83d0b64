use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LedgerError {
    #[error("question {id} is outside the ledger (1..={total})")]
    OutOfRange { id: QuestionId, total: u32 },

    #[error("ledger must hold {expected} slots, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

//
// ─── ANSWER ────────────────────────────────────────────────────────────────────
//

/// Recorded state of one question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Selected option index, `None` while unanswered.
    pub selected: Option<u8>,
    pub marked: bool,
}

impl Answer {
    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.selected.is_some()
    }
}

//
// ─── LEDGER ────────────────────────────────────────────────────────────────────
//

/// Per-question answers, indexed by question id.
///
/// Slot 0 exists so ids index directly; it is never read or written through
/// the public API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Answer>", into = "Vec<Answer>")]
pub struct AnswerLedger {
    entries: Vec<Answer>,
}

impl AnswerLedger {
    /// Creates a ledger of `total + 1` unanswered, unmarked slots.
    #[must_use]
    pub fn new(total: u32) -> Self {
        let len = usize::try_from(total).unwrap_or(0).saturating_add(1);
        Self {
            entries: vec![Answer::default(); len],
        }
    }

    /// Number of slots, including the unused slot 0.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Number of questions tracked.
    #[must_use]
    pub fn total(&self) -> u32 {
        u32::try_from(self.entries.len().saturating_sub(1)).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn contains(&self, id: QuestionId) -> bool {
        id.value() >= 1 && id.index() < self.entries.len()
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&Answer> {
        if self.contains(id) {
            self.entries.get(id.index())
        } else {
            None
        }
    }

    fn slot_mut(&mut self, id: QuestionId) -> Result<&mut Answer, LedgerError> {
        let total = self.total();
        if !self.contains(id) {
            return Err(LedgerError::OutOfRange { id, total });
        }
        self.entries
            .get_mut(id.index())
            .ok_or(LedgerError::OutOfRange { id, total })
    }

    /// Stores the selected option, keeping the mark flag.
    ///
    /// The option index is not checked against the question's option count.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::OutOfRange` for ids outside `1..=total`.
    pub fn record_answer(&mut self, id: QuestionId, option: u8) -> Result<(), LedgerError> {
        self.slot_mut(id)?.selected = Some(option);
        Ok(())
    }

    /// Flips the mark flag of one question and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::OutOfRange` for ids outside `1..=total`.
    pub fn toggle_mark(&mut self, id: QuestionId) -> Result<bool, LedgerError> {
        let slot = self.slot_mut(id)?;
        slot.marked = !slot.marked;
        Ok(slot.marked)
    }

    /// Sets the mark flag of every id in `ids` to the negation of the first id's flag.
    ///
    /// Returns the flag that was applied.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::OutOfRange` if any id is outside the ledger; no slot
    /// is modified in that case.
    pub fn toggle_mark_group(&mut self, ids: &[QuestionId]) -> Result<bool, LedgerError> {
        let total = self.total();
        if let Some(bad) = ids.iter().find(|id| !self.contains(**id)) {
            return Err(LedgerError::OutOfRange { id: *bad, total });
        }
        let Some(first) = ids.first() else {
            return Ok(false);
        };
        let target = !self.get(*first).is_some_and(|a| a.marked);
        for id in ids {
            self.slot_mut(*id)?.marked = target;
        }
        Ok(target)
    }

    /// Iterates `(id, answer)` for ids `1..=total`.
    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, &Answer)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .skip(1)
            .map(|(idx, answer)| (QuestionId::new(u32::try_from(idx).unwrap_or(u32::MAX)), answer))
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.iter().filter(|(_, a)| a.is_answered()).count()
    }

    #[must_use]
    pub fn marked_count(&self) -> usize {
        self.iter().filter(|(_, a)| a.marked).count()
    }

    /// Ids currently flagged for review, in ascending order.
    #[must_use]
    pub fn marked_ids(&self) -> Vec<QuestionId> {
        self.iter()
            .filter(|(_, a)| a.marked)
            .map(|(id, _)| id)
            .collect()
    }
}

impl TryFrom<Vec<Answer>> for AnswerLedger {
    type Error = LedgerError;

    fn try_from(entries: Vec<Answer>) -> Result<Self, Self::Error> {
        if entries.is_empty() {
            return Err(LedgerError::LengthMismatch {
                expected: 1,
                actual: 0,
            });
        }
        Ok(Self { entries })
    }
}

impl From<AnswerLedger> for Vec<Answer> {
    fn from(ledger: AnswerLedger) -> Self {
        ledger.entries
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(range: std::ops::RangeInclusive<u32>) -> Vec<QuestionId> {
        range.map(QuestionId::new).collect()
    }

    #[test]
    fn new_ledger_has_total_plus_one_slots() {
        let ledger = AnswerLedger::new(200);
        assert_eq!(ledger.len(), 201);
        assert_eq!(ledger.total(), 200);
        assert_eq!(ledger.answered_count(), 0);
        assert_eq!(ledger.iter().count(), 200);
        assert_eq!(ledger.iter().next().unwrap().0, QuestionId::new(1));
    }

    #[test]
    fn slot_zero_is_not_addressable() {
        let mut ledger = AnswerLedger::new(10);
        assert!(ledger.get(QuestionId::new(0)).is_none());
        let err = ledger.record_answer(QuestionId::new(0), 1).unwrap_err();
        assert!(matches!(err, LedgerError::OutOfRange { total: 10, .. }));
        assert!(ledger.record_answer(QuestionId::new(11), 1).is_err());
    }

    #[test]
    fn record_answer_preserves_mark() {
        let mut ledger = AnswerLedger::new(10);
        let id = QuestionId::new(4);
        ledger.toggle_mark(id).unwrap();
        ledger.record_answer(id, 2).unwrap();

        let answer = ledger.get(id).unwrap();
        assert_eq!(answer.selected, Some(2));
        assert!(answer.marked);
    }

    #[test]
    fn record_answer_does_not_validate_option_range() {
        let mut ledger = AnswerLedger::new(3);
        ledger.record_answer(QuestionId::new(1), 9).unwrap();
        assert_eq!(ledger.get(QuestionId::new(1)).unwrap().selected, Some(9));
    }

    #[test]
    fn group_toggle_follows_first_member() {
        let mut ledger = AnswerLedger::new(10);
        ledger.toggle_mark(QuestionId::new(6)).unwrap();

        let group = ids(5..=7);
        let applied = ledger.toggle_mark_group(&group).unwrap();
        assert!(applied);
        assert!(group.iter().all(|id| ledger.get(*id).unwrap().marked));

        let applied = ledger.toggle_mark_group(&group).unwrap();
        assert!(!applied);
        assert_eq!(ledger.marked_count(), 0);
    }

    #[test]
    fn group_toggle_rejects_out_of_range_without_mutation() {
        let mut ledger = AnswerLedger::new(5);
        let err = ledger.toggle_mark_group(&ids(4..=6)).unwrap_err();
        assert!(matches!(err, LedgerError::OutOfRange { .. }));
        assert_eq!(ledger.marked_count(), 0);
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut ledger = AnswerLedger::new(5);
        let before = ledger.clone();
        ledger.toggle_mark(QuestionId::new(3)).unwrap();
        ledger.toggle_mark(QuestionId::new(3)).unwrap();
        assert_eq!(ledger, before);
    }
}
