use std::sync::Arc;

use reflex_core::model::DifficultyTier;
use reflex_core::{Clock, NumberGenerator, RandomSource};
use tokio::sync::mpsc;

use crate::error::SessionError;
use crate::random::{SeededSource, ThreadRngSource};
use crate::speech::SpeechAnnouncer;

use super::controller::{ExerciseSession, SessionTiming};
use super::scheduler::{Scheduler, TokioScheduler};
use super::session_loop::{SessionHandle, SessionLoop};

/// Builds the randomness for each new session.
pub type RandomFactory = Arc<dyn Fn() -> Box<dyn RandomSource> + Send + Sync>;

/// A started session: the handle for the view, the loop for the executor.
pub struct SessionLaunch {
    pub handle: SessionHandle,
    pub session_loop: SessionLoop,
}

/// Assembles sessions from the app-wide collaborators.
#[derive(Clone)]
pub struct SessionLauncher {
    clock: Clock,
    timing: SessionTiming,
    announcer: SpeechAnnouncer,
    random: RandomFactory,
}

impl SessionLauncher {
    #[must_use]
    pub fn new(clock: Clock, announcer: SpeechAnnouncer) -> Self {
        Self {
            clock,
            timing: SessionTiming::default(),
            announcer,
            random: Arc::new(|| -> Box<dyn RandomSource> { Box::new(ThreadRngSource) }),
        }
    }

    /// Every session replays the same number sequence for `seed`.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_random_source(move || Box::new(SeededSource::new(seed)))
    }

    #[must_use]
    pub fn with_random_source<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn RandomSource> + Send + Sync + 'static,
    {
        self.random = Arc::new(factory);
        self
    }

    #[must_use]
    pub fn with_timing(mut self, timing: SessionTiming) -> Self {
        self.timing = timing;
        self
    }

    /// An idle controller wired to `scheduler`.
    #[must_use]
    pub fn controller(&self, tier: DifficultyTier, scheduler: Arc<dyn Scheduler>) -> ExerciseSession {
        ExerciseSession::new(
            tier,
            NumberGenerator::new((self.random)()),
            self.announcer.clone(),
            scheduler,
            self.timing,
            self.clock,
        )
    }

    /// Start a session on tokio timers.
    ///
    /// Must be called from within a tokio runtime; the returned loop has to be
    /// spawned (or awaited) for anything to happen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session cannot be started.
    pub fn launch(&self, tier: DifficultyTier) -> Result<SessionLaunch, SessionError> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let scheduler = Arc::new(TokioScheduler::new(sender.clone()));
        let mut session = self.controller(tier, scheduler);
        session.start()?;
        let (handle, session_loop) = SessionLoop::new(session, sender, receiver);
        Ok(SessionLaunch {
            handle,
            session_loop,
        })
    }
}
