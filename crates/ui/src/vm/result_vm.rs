use exam_core::Tally;
use exam_core::model::{QuestionId, SubmitReason};
use services::{AttemptListItem, SubmittedAttempt};

use crate::vm::time_fmt::{format_countdown, format_datetime};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TallyVm {
    pub title: String,
    pub answered_label: String,
    pub marked_label: String,
    /// Present only when the question set ships answer keys.
    pub score_label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub attempt_id: i64,
    pub reason_label: &'static str,
    pub submitted_at_str: String,
    pub time_left_label: String,
    pub overall: TallyVm,
    pub sections: Vec<TallyVm>,
    pub parts: Vec<TallyVm>,
    /// Questions still flagged for review when the attempt was submitted.
    pub marked_questions: Vec<QuestionId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptHistoryItemVm {
    pub id: i64,
    pub submitted_at_str: String,
    pub reason_label: &'static str,
    pub answered_label: String,
    pub time_left_label: String,
}

#[must_use]
pub fn reason_label(reason: SubmitReason) -> &'static str {
    match reason {
        SubmitReason::Confirmed => "Submitted",
        SubmitReason::TimeExpired => "Time expired",
    }
}

fn map_tally(title: impl Into<String>, tally: &Tally) -> TallyVm {
    TallyVm {
        title: title.into(),
        answered_label: format!("{}/{} answered", tally.answered, tally.total),
        marked_label: format!("{} marked", tally.marked),
        score_label: (tally.keyed > 0).then(|| format!("{}/{} correct", tally.correct, tally.keyed)),
    }
}

#[must_use]
pub fn map_result(submitted: &SubmittedAttempt) -> ResultVm {
    let result = &submitted.result;
    ResultVm {
        attempt_id: submitted.id,
        reason_label: reason_label(submitted.attempt.reason()),
        submitted_at_str: format_datetime(submitted.attempt.submitted_at()),
        time_left_label: format_countdown(submitted.attempt.time_remaining_secs()),
        overall: map_tally("Overall", &result.overall()),
        sections: vec![
            map_tally("Listening", &result.listening),
            map_tally("Reading", &result.reading),
        ],
        parts: result
            .by_part
            .iter()
            .map(|(part, tally)| map_tally(part.tooltip(), tally))
            .collect(),
        marked_questions: submitted.attempt.answers().marked_ids(),
    }
}

impl From<&AttemptListItem> for AttemptHistoryItemVm {
    fn from(item: &AttemptListItem) -> Self {
        Self {
            id: item.id,
            submitted_at_str: format_datetime(item.submitted_at),
            reason_label: reason_label(item.reason),
            answered_label: format!("{}/{} answered", item.answered, item.total),
            time_left_label: format_countdown(item.time_remaining_secs),
        }
    }
}

#[must_use]
pub fn map_attempt_history(items: &[AttemptListItem]) -> Vec<AttemptHistoryItemVm> {
    items.iter().map(AttemptHistoryItemVm::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{AnswerLedger, ExamAttempt, ExamSessionId, QuestionId};
    use exam_core::time::fixed_now;
    use exam_core::{ExamConfig, ExamResult, QuestionCatalog};

    #[test]
    fn result_lists_sections_and_parts_with_scores() {
        let catalog = QuestionCatalog::sample(ExamConfig::default()).unwrap();
        let mut answers = AnswerLedger::new(200);
        let id = QuestionId::new(5);
        answers.record_answer(id, catalog.answer_key(id).unwrap()).unwrap();
        answers.toggle_mark(QuestionId::new(150)).unwrap();
        answers.toggle_mark(QuestionId::new(12)).unwrap();

        let attempt = ExamAttempt::new(
            ExamSessionId::generate(),
            fixed_now(),
            fixed_now(),
            SubmitReason::TimeExpired,
            0,
            answers.clone(),
        )
        .unwrap();
        let submitted = SubmittedAttempt {
            id: 3,
            result: ExamResult::compute(&catalog, &answers),
            attempt,
        };

        let vm = map_result(&submitted);
        assert_eq!(vm.reason_label, "Time expired");
        assert_eq!(vm.time_left_label, "00:00");
        assert_eq!(vm.overall.answered_label, "1/200 answered");
        assert_eq!(vm.overall.score_label.as_deref(), Some("1/200 correct"));
        assert_eq!(vm.sections[0].title, "Listening");
        assert_eq!(vm.parts.len(), 7);
        assert_eq!(vm.parts[0].answered_label, "1/6 answered");
        assert_eq!(vm.marked_questions, vec![QuestionId::new(12), QuestionId::new(150)]);
    }

    #[test]
    fn unkeyed_results_hide_scores() {
        let catalog = QuestionCatalog::empty(ExamConfig::default()).unwrap();
        let answers = AnswerLedger::new(200);
        let vm = map_tally("Overall", &ExamResult::compute(&catalog, &answers).overall());
        assert_eq!(vm.score_label, None);
    }
}
