use reflex_core::model::{ScoreBand, SessionSummary};

use super::format::format_elapsed;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryVm {
    pub emoji: &'static str,
    pub percentage_label: String,
    pub detail: String,
    pub elapsed_label: String,
    pub tier_title: &'static str,
}

#[must_use]
pub fn map_summary(summary: &SessionSummary) -> SummaryVm {
    let emoji = match summary.band() {
        ScoreBand::Strong => "🎉",
        ScoreBand::Fair => "👍",
        ScoreBand::Weak => "💪",
    };
    SummaryVm {
        emoji,
        percentage_label: format!("{}%", summary.final_percentage()),
        detail: format!(
            "You got {}/{} right",
            summary.score(),
            summary.rounds()
        ),
        elapsed_label: format_elapsed(summary.elapsed()),
        tier_title: summary.tier().title(),
    }
}
