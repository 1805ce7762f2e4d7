#![forbid(unsafe_code)]

pub mod error;
pub mod random;
pub mod sessions;
pub mod speech;
pub mod theme_service;

pub use reflex_core::Clock;

pub use error::{SessionError, SpeechSettingsError, ThemeServiceError};
pub use random::{SeededSource, ThreadRngSource};
pub use sessions::{
    ExerciseSession, ManualScheduler, RoundId, Scheduler, SessionCommand, SessionEvent,
    SessionHandle, SessionLaunch, SessionLauncher, SessionLoop, SessionSnapshot, SessionTiming,
    TokioScheduler,
};
pub use speech::{SilentSink, SpeechAnnouncer, SpeechSettings, SpeechSink, Utterance};
pub use theme_service::ThemeService;
