#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    SessionUnavailable,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::SessionUnavailable => "The exercise could not be started. Please try again.",
        }
    }
}
