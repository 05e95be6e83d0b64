use exam_core::QuestionCatalog;
use exam_core::model::{Part, QuestionId, Section};
use services::SessionSnapshot;

/// One cell of the question grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigatorCellVm {
    pub id: QuestionId,
    pub label: String,
    pub tooltip: String,
    pub is_current: bool,
    pub is_answered: bool,
    pub is_marked: bool,
    /// Clicking the cell would be rejected.
    pub is_locked: bool,
}

/// Cells of one part, in id order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigatorPartVm {
    pub part: Part,
    pub title: String,
    pub answered_label: String,
    pub cells: Vec<NavigatorCellVm>,
}

#[must_use]
pub fn map_navigator(catalog: &QuestionCatalog, snapshot: &SessionSnapshot) -> Vec<NavigatorPartVm> {
    let config = catalog.config();
    let current_range = catalog.block_of(snapshot.current_question).map_or(
        (snapshot.current_question, snapshot.current_question),
        |block| (block.first_id(), block.last_id()),
    );

    let mut parts: Vec<NavigatorPartVm> = Vec::new();
    for raw in 1..=config.total_questions {
        let id = QuestionId::new(raw);
        let answer = snapshot.answers.get(id).copied().unwrap_or_default();
        let is_locked = snapshot.is_completed
            || match snapshot.section {
                Section::Listening => true,
                Section::Reading => id < config.reading_start_id(),
            };
        let cell = NavigatorCellVm {
            id,
            label: raw.to_string(),
            tooltip: catalog.get_part_tooltip(id),
            is_current: (current_range.0..=current_range.1).contains(&id),
            is_answered: answer.is_answered(),
            is_marked: answer.marked,
            is_locked,
        };

        let part = Part::for_question(id);
        match parts.last_mut() {
            Some(group) if group.part == part => group.cells.push(cell),
            _ => parts.push(NavigatorPartVm {
                part,
                title: part.tooltip(),
                answered_label: String::new(),
                cells: vec![cell],
            }),
        }
    }

    for group in &mut parts {
        let answered = group.cells.iter().filter(|cell| cell.is_answered).count();
        group.answered_label = format!("{answered}/{} answered", group.cells.len());
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use exam_core::ExamConfig;
    use exam_core::model::ExamSessionId;
    use exam_core::time::fixed_now;
    use services::SessionController;

    fn controller(config: ExamConfig) -> SessionController {
        let catalog = Arc::new(QuestionCatalog::sample(config).unwrap());
        SessionController::new(ExamSessionId::generate(), catalog, fixed_now())
    }

    #[test]
    fn listening_locks_every_cell() {
        let mut session = controller(ExamConfig::default());
        session.on_answer(QuestionId::new(1), 0);
        let parts = map_navigator(session.catalog(), &session.snapshot());

        assert_eq!(parts.len(), 7);
        assert_eq!(parts[0].title, "Part 1: Photographs");
        assert_eq!(parts[0].answered_label, "1/6 answered");
        assert!(parts.iter().flat_map(|p| &p.cells).all(|cell| cell.is_locked));
        assert!(parts[0].cells[0].is_current);
        assert!(parts[0].cells[0].is_answered);
    }

    #[test]
    fn reading_highlights_the_whole_current_block() {
        let mut session = controller(ExamConfig {
            listening_duration_secs: 1,
            ..ExamConfig::default()
        });
        session.advance(Duration::from_secs(4));
        session.go_to_question(QuestionId::new(131));
        session.on_mark_toggle();

        let parts = map_navigator(session.catalog(), &session.snapshot());
        let cells: Vec<_> = parts.iter().flat_map(|p| p.cells.iter()).collect();
        let current: Vec<u32> = cells
            .iter()
            .filter(|c| c.is_current)
            .map(|c| c.id.value())
            .collect();
        assert_eq!(current, vec![131, 132, 133, 134]);
        assert!(cells[133].is_marked);
        assert!(cells[0].is_locked);
        assert!(!cells[100].is_locked);
        assert_eq!(cells[140].tooltip, "Part 6: Text Completion");
    }
}
