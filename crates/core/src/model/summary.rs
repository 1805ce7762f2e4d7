use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::model::session::ROUNDS_PER_SESSION;
use crate::model::tier::DifficultyTier;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("score ({score}) exceeds rounds played ({rounds})")]
    ScoreExceedsRounds { score: u32, rounds: u32 },

    #[error("too many rounds for a single session: {rounds}")]
    TooManyRounds { rounds: u32 },
}

/// `round(score / rounds * 100)`, or `0` when no rounds were played.
///
/// Halves round up, matching the usual rounding of a positive ratio.
#[must_use]
pub fn percentage(score: u32, rounds: u32) -> u32 {
    if rounds == 0 {
        return 0;
    }
    let score = u64::from(score);
    let rounds = u64::from(rounds);
    let value = (score * 200 + rounds) / (rounds * 2);
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Coarse grading of a percentage, used for colours and the summary emoji.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Strong,
    Fair,
    Weak,
}

impl ScoreBand {
    #[must_use]
    pub fn from_percentage(value: u32) -> Self {
        if value >= 80 {
            ScoreBand::Strong
        } else if value >= 60 {
            ScoreBand::Fair
        } else {
            ScoreBand::Weak
        }
    }
}

/// Final tally of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    tier: DifficultyTier,
    score: u32,
    rounds: u32,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl SessionSummary {
    /// # Errors
    ///
    /// Returns `SessionSummaryError` if the score cannot belong to the rounds
    /// played, if more rounds than a session allows are reported, or if the
    /// time range is inverted.
    pub fn new(
        tier: DifficultyTier,
        score: u32,
        rounds: u32,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, SessionSummaryError> {
        if completed_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }
        if rounds > ROUNDS_PER_SESSION {
            return Err(SessionSummaryError::TooManyRounds { rounds });
        }
        if score > rounds {
            return Err(SessionSummaryError::ScoreExceedsRounds { score, rounds });
        }
        Ok(Self {
            tier,
            score,
            rounds,
            started_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn tier(&self) -> DifficultyTier {
        self.tier
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.completed_at - self.started_at
    }

    #[must_use]
    pub fn final_percentage(&self) -> u32 {
        percentage(self.score, self.rounds)
    }

    #[must_use]
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_percentage(self.final_percentage())
    }
}
