mod controller;
mod deferred;
mod navigation;
mod section_clock;
mod snapshot;
mod workflow;

// Public API of the exam session subsystem.
pub use crate::error::SessionError;
pub use controller::{SessionCompletion, SessionController};
pub use deferred::{DeferredAction, DeferredKind, DeferredQueue};
pub use navigation::{NavOutcome, NavigationGuard, Rejection};
pub use section_clock::{SectionClock, TickOutcome};
pub use snapshot::{SessionProgress, SessionSnapshot};
pub use workflow::{AttemptListItem, ExamSessionService, SubmittedAttempt};
