mod exam_vm;
mod navigator_vm;
mod question_panel_vm;
mod result_vm;
mod time_fmt;

pub use exam_vm::{
    ExamFrameVm, ExamHeaderVm, ExamIntent, ExamSessionVm, TRANSITION_NOTICE, map_exam_frame,
    map_exam_header, start_exam,
};
pub use navigator_vm::{NavigatorCellVm, NavigatorPartVm, map_navigator};
pub use question_panel_vm::{OptionVm, QuestionPanelVm, SubQuestionVm, map_question_panel};
pub use result_vm::{
    AttemptHistoryItemVm, ResultVm, TallyVm, map_attempt_history, map_result, reason_label,
};
pub use time_fmt::{format_countdown, format_datetime};
