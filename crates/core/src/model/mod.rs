mod session;
mod summary;
mod theme;
mod tier;

pub use session::{ROUND_SECONDS, ROUNDS_PER_SESSION, SessionPhase, SessionState, Verdict};
pub use summary::{ScoreBand, SessionSummary, SessionSummaryError, percentage};
pub use theme::{THEME_STORAGE_KEY, Theme, ThemeError};
pub use tier::{DifficultyTier, TierError, TierRange};
