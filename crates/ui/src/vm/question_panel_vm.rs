use exam_core::QuestionCatalog;
use exam_core::model::{AnswerLedger, Question, QuestionId};

/// One selectable option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: u8,
    pub letter: char,
    pub label: String,
    pub is_selected: bool,
}

/// A sub-question rendered under a shared passage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubQuestionVm {
    pub id: QuestionId,
    pub number_label: String,
    pub text: String,
    pub is_marked: bool,
    pub options: Vec<OptionVm>,
}

/// Which renderer the current question needs, with everything it displays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuestionPanelVm {
    Listening {
        id: QuestionId,
        number_label: String,
        part_label: String,
        image_ref: Option<String>,
        audio_ref: String,
        audio_ended: bool,
        is_marked: bool,
        options: Vec<OptionVm>,
    },
    ReadingSingle {
        id: QuestionId,
        number_label: String,
        part_label: String,
        prompt: String,
        is_marked: bool,
        options: Vec<OptionVm>,
    },
    ReadingBlock {
        range_label: String,
        part_label: String,
        passage: String,
        questions: Vec<SubQuestionVm>,
    },
}

impl QuestionPanelVm {
    /// Ids a view can answer from this panel.
    #[must_use]
    pub fn answerable_ids(&self) -> Vec<QuestionId> {
        match self {
            QuestionPanelVm::Listening { id, .. } | QuestionPanelVm::ReadingSingle { id, .. } => {
                vec![*id]
            }
            QuestionPanelVm::ReadingBlock { questions, .. } => {
                questions.iter().map(|q| q.id).collect()
            }
        }
    }
}

#[must_use]
pub fn map_question_panel(
    catalog: &QuestionCatalog,
    answers: &AnswerLedger,
    current: QuestionId,
    audio_ended: bool,
) -> QuestionPanelVm {
    let question = catalog.get_question_data(current);
    let part_label = question.part().tooltip();
    match question.as_ref() {
        Question::Listening(q) => QuestionPanelVm::Listening {
            id: q.id,
            number_label: number_label(q.id),
            part_label,
            image_ref: q.image_ref.clone(),
            audio_ref: q.audio_ref.clone(),
            audio_ended,
            is_marked: is_marked(answers, q.id),
            options: map_options(&q.options, selected(answers, q.id)),
        },
        Question::ReadingSingle(q) => QuestionPanelVm::ReadingSingle {
            id: q.id,
            number_label: number_label(q.id),
            part_label,
            prompt: q.prompt.clone(),
            is_marked: is_marked(answers, q.id),
            options: map_options(&q.options, selected(answers, q.id)),
        },
        Question::ReadingBlock(block) => QuestionPanelVm::ReadingBlock {
            range_label: format!(
                "Questions {}-{}",
                block.first_id(),
                block.last_id()
            ),
            part_label,
            passage: block.passage.clone(),
            questions: block
                .questions
                .iter()
                .map(|sub| SubQuestionVm {
                    id: sub.id,
                    number_label: number_label(sub.id),
                    text: sub.text.clone(),
                    is_marked: is_marked(answers, sub.id),
                    options: map_options(&sub.options, selected(answers, sub.id)),
                })
                .collect(),
        },
    }
}

fn number_label(id: QuestionId) -> String {
    format!("Question {id}")
}

fn selected(answers: &AnswerLedger, id: QuestionId) -> Option<u8> {
    answers.get(id).and_then(|answer| answer.selected)
}

fn is_marked(answers: &AnswerLedger, id: QuestionId) -> bool {
    answers.get(id).is_some_and(|answer| answer.marked)
}

fn map_options(labels: &[String], selected: Option<u8>) -> Vec<OptionVm> {
    labels
        .iter()
        .zip(0u8..)
        .map(|(label, index)| OptionVm {
            index,
            letter: option_letter(index),
            label: label.clone(),
            is_selected: selected == Some(index),
        })
        .collect()
}

fn option_letter(index: u8) -> char {
    char::from(b'A'.saturating_add(index))
}
