use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TierError {
    #[error("unknown difficulty tier {raw:?} (expected beginner, intermediate or advanced)")]
    Unknown { raw: String },
}

//
// ─── RANGE ────────────────────────────────────────────────────────────────────
//

/// Inclusive integer bounds a tier draws its numbers from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierRange {
    min: u32,
    max: u32,
}

impl TierRange {
    const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub const fn min(self) -> u32 {
        self.min
    }

    #[must_use]
    pub const fn max(self) -> u32 {
        self.max
    }

    /// Number of distinct values in the range.
    #[must_use]
    pub const fn span(self) -> u32 {
        self.max - self.min + 1
    }

    #[must_use]
    pub const fn contains(self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }
}

//
// ─── TIER ─────────────────────────────────────────────────────────────────────
//

/// Difficulty level chosen before a session starts.
///
/// The tier is fixed for the lifetime of a session and decides which numbers
/// the learner hears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] = [
        DifficultyTier::Beginner,
        DifficultyTier::Intermediate,
        DifficultyTier::Advanced,
    ];

    #[must_use]
    pub const fn range(self) -> TierRange {
        match self {
            DifficultyTier::Beginner => TierRange::new(1, 10),
            DifficultyTier::Intermediate => TierRange::new(1, 100),
            DifficultyTier::Advanced => TierRange::new(100, 999_999),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DifficultyTier::Beginner => "beginner",
            DifficultyTier::Intermediate => "intermediate",
            DifficultyTier::Advanced => "advanced",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            DifficultyTier::Beginner => "Beginner",
            DifficultyTier::Intermediate => "Intermediate",
            DifficultyTier::Advanced => "Advanced",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            DifficultyTier::Beginner => "Numbers from 1 to 10",
            DifficultyTier::Intermediate => "Numbers from 1 to 100",
            DifficultyTier::Advanced => "Large and complex numbers",
        }
    }

    /// Sample numbers shown on the selector card.
    #[must_use]
    pub const fn examples(self) -> &'static str {
        match self {
            DifficultyTier::Beginner => "1, 5, 9, 10",
            DifficultyTier::Intermediate => "23, 67, 89, 100",
            DifficultyTier::Advanced => "1,247, 50,893, 999,999",
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyTier {
    type Err = TierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(TierError::Unknown { raw: s.to_string() }),
        }
    }
}
