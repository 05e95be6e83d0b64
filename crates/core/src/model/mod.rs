mod answer;
mod attempt;
mod ids;
mod part;
mod question;
mod section;

pub use answer::{Answer, AnswerLedger, LedgerError};
pub use attempt::{AttemptError, ExamAttempt, SubmitReason};
pub use ids::{ExamSessionId, ParseIdError, QuestionId};
pub use part::{Part, PartError};
pub use question::{
    ListeningQuestion, PLACEHOLDER_OPTIONS, Question, QuestionKind, ReadingBlockQuestion,
    ReadingSingleQuestion, SubQuestion,
};
pub use section::Section;
