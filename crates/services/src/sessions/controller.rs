use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reflex_core::model::{
    DifficultyTier, ROUND_SECONDS, SessionPhase, SessionState, SessionSummary, Verdict,
};
use reflex_core::{Clock, NumberGenerator, RoundTimer, TimerEvent, TimerToken};

use crate::error::SessionError;
use crate::speech::SpeechAnnouncer;

use super::scheduler::Scheduler;

//
// ─── TIMING ────────────────────────────────────────────────────────────────────
//

/// Delays the controller asks its scheduler for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    /// One countdown step of the round timer.
    pub tick_interval: Duration,
    /// Gap between showing a number and speaking it.
    pub announce_delay: Duration,
    /// How long feedback stays up before the next round.
    pub feedback_delay: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            announce_delay: Duration::from_millis(500),
            feedback_delay: Duration::from_millis(1500),
        }
    }
}

//
// ─── EVENTS ────────────────────────────────────────────────────────────────────
//

/// Identifies one round; stale delayed events carry an old id and are dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RoundId(u64);

impl RoundId {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Delayed work the controller scheduled for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Tick(TimerToken),
    Announce(RoundId),
    Advance(RoundId),
}

/// Everything a view needs to render the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub tier: DifficultyTier,
    pub phase: SessionPhase,
    pub state: SessionState,
    pub summary: Option<SessionSummary>,
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Runs one learner's drill: ten rounds of generate, speak, verdict.
///
/// The controller never sleeps. Every delay is handed to the injected
/// [`Scheduler`] as a [`SessionEvent`] and comes back through
/// [`ExerciseSession::handle`], which keeps it deterministic under test.
pub struct ExerciseSession {
    tier: DifficultyTier,
    generator: NumberGenerator,
    announcer: SpeechAnnouncer,
    scheduler: Arc<dyn Scheduler>,
    timing: SessionTiming,
    clock: Clock,
    state: SessionState,
    phase: SessionPhase,
    timer: RoundTimer,
    round: RoundId,
    started_at: DateTime<Utc>,
    summary: Option<SessionSummary>,
}

impl ExerciseSession {
    #[must_use]
    pub fn new(
        tier: DifficultyTier,
        generator: NumberGenerator,
        announcer: SpeechAnnouncer,
        scheduler: Arc<dyn Scheduler>,
        timing: SessionTiming,
        clock: Clock,
    ) -> Self {
        Self {
            tier,
            generator,
            announcer,
            scheduler,
            timing,
            clock,
            state: SessionState::new(),
            phase: SessionPhase::Idle,
            timer: RoundTimer::new(),
            round: RoundId::default(),
            started_at: clock.now(),
            summary: None,
        }
    }

    #[must_use]
    pub fn tier(&self) -> DifficultyTier {
        self.tier
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    #[must_use]
    pub fn timer_armed(&self) -> bool {
        self.timer.is_armed()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            tier: self.tier,
            phase: self.phase,
            state: self.state.clone(),
            summary: self.summary.clone(),
        }
    }

    /// Leave `Idle` and play the first round.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyStarted` unless the session is idle.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Idle {
            return Err(SessionError::AlreadyStarted);
        }
        tracing::info!(tier = %self.tier, "session started");
        self.restart();
        Ok(())
    }

    /// Play again after the summary, with fresh counters and a fresh number.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotComplete` unless the session has finished.
    pub fn retry(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::SessionComplete {
            return Err(SessionError::NotComplete);
        }
        tracing::info!(tier = %self.tier, "session retried");
        self.restart();
        Ok(())
    }

    /// Record the learner's verdict for the active round.
    ///
    /// Returns `false` when the round is no longer accepting verdicts; the
    /// state is left untouched in that case.
    pub fn submit(&mut self, verdict: Verdict) -> bool {
        if self.phase != SessionPhase::RoundActive || !self.state.round_active() {
            tracing::debug!(?verdict, phase = ?self.phase, "verdict ignored; round inactive");
            return false;
        }
        self.timer.disarm();
        self.close_round(verdict);
        true
    }

    /// Speak the current number again. Only while the round is active.
    pub fn replay(&mut self) -> bool {
        if !self.state.round_active() {
            return false;
        }
        self.announcer.announce(self.state.current_number());
        true
    }

    /// Apply a delayed event that came back from the scheduler.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Summary` if the final tally cannot be built.
    pub fn handle(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        match event {
            SessionEvent::Tick(token) => {
                self.on_tick(token);
                Ok(())
            }
            SessionEvent::Announce(round) => {
                if round == self.round && self.phase != SessionPhase::Idle {
                    self.announcer.announce(self.state.current_number());
                }
                Ok(())
            }
            SessionEvent::Advance(round) => {
                if round != self.round || self.phase != SessionPhase::RoundFeedback {
                    return Ok(());
                }
                self.advance()
            }
        }
    }

    /// Stop the timer, drop pending work and return to `Idle`.
    pub fn teardown(&mut self) {
        self.timer.disarm();
        self.round = self.round.next();
        self.state.reset();
        self.summary = None;
        self.phase = SessionPhase::Idle;
        tracing::debug!(tier = %self.tier, "session torn down");
    }

    fn restart(&mut self) {
        self.state.reset();
        self.summary = None;
        self.started_at = self.clock.now();
        self.begin_round();
    }

    fn begin_round(&mut self) {
        self.round = self.round.next();
        let number = self.generator.generate(self.tier);
        if !self.state.begin_round(number, ROUND_SECONDS) {
            return;
        }
        let token = self.timer.arm(ROUND_SECONDS);
        self.phase = SessionPhase::RoundActive;
        self.scheduler
            .schedule(self.timing.tick_interval, SessionEvent::Tick(token));
        self.scheduler
            .schedule(self.timing.announce_delay, SessionEvent::Announce(self.round));
        tracing::debug!(
            round = self.round.value(),
            number,
            completed = self.state.rounds_completed(),
            "round started"
        );
    }

    fn on_tick(&mut self, token: TimerToken) {
        match self.timer.tick(token) {
            TimerEvent::Tick(remaining) => {
                self.state.set_time_remaining(remaining);
                self.scheduler
                    .schedule(self.timing.tick_interval, SessionEvent::Tick(token));
            }
            TimerEvent::Timeout => {
                self.state.set_time_remaining(0);
                tracing::debug!(round = self.round.value(), "round timed out");
                self.close_round(Verdict::Incorrect);
            }
            TimerEvent::Ignored => {}
        }
    }

    fn close_round(&mut self, verdict: Verdict) {
        if !self.state.record(verdict) {
            return;
        }
        self.phase = SessionPhase::RoundFeedback;
        self.scheduler
            .schedule(self.timing.feedback_delay, SessionEvent::Advance(self.round));
        tracing::debug!(
            ?verdict,
            score = self.state.score(),
            completed = self.state.rounds_completed(),
            "round closed"
        );
    }

    fn advance(&mut self) -> Result<(), SessionError> {
        if !self.state.rounds_exhausted() {
            self.begin_round();
            return Ok(());
        }
        let summary = SessionSummary::new(
            self.tier,
            self.state.score(),
            self.state.rounds_completed(),
            self.started_at,
            self.clock.now(),
        )?;
        self.state.finish();
        tracing::info!(
            tier = %self.tier,
            score = summary.score(),
            percentage = summary.final_percentage(),
            elapsed_secs = self.clock.elapsed_since(self.started_at).num_seconds(),
            "session complete"
        );
        self.summary = Some(summary);
        self.phase = SessionPhase::SessionComplete;
        Ok(())
    }
}

impl std::fmt::Debug for ExerciseSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExerciseSession")
            .field("tier", &self.tier)
            .field("phase", &self.phase)
            .field("state", &self.state)
            .field("round", &self.round)
            .finish_non_exhaustive()
    }
}
