mod format;
mod session_vm;
mod summary_vm;
mod tier_vm;

pub use format::{format_elapsed, format_thousands};
pub use session_vm::{ExerciseVm, FeedbackVm, ScoreTone, Shortcut, shortcut_for};
pub use summary_vm::{SummaryVm, map_summary};
pub use tier_vm::{TierCardVm, tier_cards};
