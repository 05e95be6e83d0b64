#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    /// The question set failed validation.
    InvalidQuestionSet,
    /// The session behind the screen has ended.
    SessionClosed,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::InvalidQuestionSet => "The question set could not be loaded.",
            ViewError::SessionClosed => "This exam session has ended.",
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }
}
