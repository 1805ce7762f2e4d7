//! Shared error types for the services crate.

use thiserror::Error;

use reflex_core::model::SessionSummaryError;
use storage::repository::StorageError;

/// Errors emitted by the exercise session controller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session already started")]
    AlreadyStarted,
    #[error("session is not complete yet")]
    NotComplete,
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
}

/// Errors emitted by `ThemeService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ThemeServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Rejected speech configuration.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SpeechSettingsError {
    #[error("speech locale must not be empty")]
    EmptyLocale,
    #[error("speech rate {0} is outside 0.1..=10")]
    RateOutOfRange(f32),
    #[error("speech pitch {0} is outside 0..=2")]
    PitchOutOfRange(f32),
}
