//! Countdown for a single round, independent of any real clock.
//!
//! The caller schedules ticks however it likes and feeds them back with the
//! token returned by [`RoundTimer::arm`]. Ticks carrying a stale token are
//! ignored, so a disarmed or re-armed timer can never fire late.

/// Identifies one arming of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

impl TimerToken {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Still counting; seconds left.
    Tick(u32),
    /// Reached zero. The timer is now disarmed.
    Timeout,
    /// Tick belonged to a disarmed or superseded arming.
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct RoundTimer {
    generation: u64,
    remaining: u32,
    armed: bool,
}

impl RoundTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Start counting down from `seconds`, replacing any previous arming.
    ///
    /// A zero duration times out on the first tick.
    pub fn arm(&mut self, seconds: u32) -> TimerToken {
        self.disarm();
        self.remaining = seconds;
        self.armed = true;
        TimerToken(self.generation)
    }

    /// Cancel the countdown without firing a timeout.
    ///
    /// Returns whether the timer was armed.
    pub fn disarm(&mut self) -> bool {
        let was_armed = self.armed;
        self.armed = false;
        self.generation = self.generation.wrapping_add(1);
        was_armed
    }

    /// Advance one time unit for the arming identified by `token`.
    pub fn tick(&mut self, token: TimerToken) -> TimerEvent {
        if !self.armed || token.0 != self.generation {
            return TimerEvent::Ignored;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.armed = false;
            TimerEvent::Timeout
        } else {
            TimerEvent::Tick(self.remaining)
        }
    }
}
