#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod exam;
pub mod runner;

pub use exam_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, SessionError};
pub use exam::{
    AttemptListItem, ExamSessionService, NavOutcome, Rejection, SessionCompletion,
    SessionController, SessionProgress, SessionSnapshot, SubmittedAttempt,
};
pub use runner::{SessionCommand, SessionHandle};
