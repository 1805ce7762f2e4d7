mod controller;
mod launcher;
mod scheduler;
mod session_loop;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use controller::{ExerciseSession, RoundId, SessionEvent, SessionSnapshot, SessionTiming};
pub use launcher::{RandomFactory, SessionLaunch, SessionLauncher};
pub use scheduler::{ManualScheduler, Scheduler, TokioScheduler};
pub use session_loop::{SessionCommand, SessionHandle, SessionLoop};
