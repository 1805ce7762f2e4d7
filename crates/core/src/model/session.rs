use serde::{Deserialize, Serialize};

use crate::model::summary::percentage;

/// Rounds in one session.
pub const ROUNDS_PER_SESSION: u32 = 10;

/// Seconds the learner has to answer before a round times out.
pub const ROUND_SECONDS: u32 = 5;

/// The learner's self-reported judgment for a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Correct,
    Incorrect,
}

/// Where the session state machine currently sits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// No session running.
    #[default]
    Idle,
    /// Number shown, timer running, awaiting a verdict.
    RoundActive,
    /// Verdict or timeout recorded; waiting to move on.
    RoundFeedback,
    /// All rounds played. Terminal until retry.
    SessionComplete,
}

/// Mutable counters for one session.
///
/// Invariants held by every mutator:
/// - `rounds_completed <= ROUNDS_PER_SESSION`
/// - `score <= rounds_completed`
/// - `time_remaining` only moves while `round_active`
/// - `complete` flips to true once, after the last round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    current_number: u32,
    score: u32,
    rounds_completed: u32,
    time_remaining: u32,
    round_active: bool,
    last_feedback: Option<Verdict>,
    complete: bool,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current_number(&self) -> u32 {
        self.current_number
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn rounds_completed(&self) -> u32 {
        self.rounds_completed
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    #[must_use]
    pub fn round_active(&self) -> bool {
        self.round_active
    }

    #[must_use]
    pub fn last_feedback(&self) -> Option<Verdict> {
        self.last_feedback
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// True once every round has been answered or timed out.
    #[must_use]
    pub fn rounds_exhausted(&self) -> bool {
        self.rounds_completed >= ROUNDS_PER_SESSION
    }

    /// Running percentage of correct answers, `0` before the first verdict.
    #[must_use]
    pub fn running_percentage(&self) -> u32 {
        percentage(self.score, self.rounds_completed)
    }

    /// Zero every counter and clear the completion flag.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Show a new number and reopen the round for a verdict.
    ///
    /// Returns `false` (and changes nothing) once the session is complete or
    /// every round has been played.
    pub fn begin_round(&mut self, number: u32, seconds: u32) -> bool {
        if self.complete || self.rounds_exhausted() {
            return false;
        }
        self.current_number = number;
        self.time_remaining = seconds;
        self.round_active = true;
        self.last_feedback = None;
        true
    }

    /// Mirror the round timer's remaining seconds.
    ///
    /// Ignored unless the round is active; the value can only go down.
    pub fn set_time_remaining(&mut self, seconds: u32) {
        if self.round_active && seconds < self.time_remaining {
            self.time_remaining = seconds;
        }
    }

    /// Record a verdict for the active round.
    ///
    /// Returns `false` when the round is not accepting verdicts, leaving the
    /// state untouched.
    pub fn record(&mut self, verdict: Verdict) -> bool {
        if !self.round_active {
            return false;
        }
        if verdict == Verdict::Correct {
            self.score += 1;
        }
        self.rounds_completed += 1;
        self.last_feedback = Some(verdict);
        self.round_active = false;
        true
    }

    /// Mark the session finished. Only takes effect once all rounds are played.
    pub fn finish(&mut self) -> bool {
        if self.complete || self.round_active || !self.rounds_exhausted() {
            return false;
        }
        self.complete = true;
        true
    }
}
