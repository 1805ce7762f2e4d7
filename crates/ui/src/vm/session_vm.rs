use dioxus::prelude::{Code, Key};
use reflex_core::model::{ROUNDS_PER_SESSION, SessionPhase, Verdict};
use services::SessionSnapshot;

use super::format::format_thousands;

/// Colour band for the running score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreTone {
    Good,
    Fair,
    Poor,
}

impl ScoreTone {
    /// >= 80 good, >= 60 fair, anything lower poor.
    #[must_use]
    pub fn from_percentage(percent: u32) -> Self {
        if percent >= 80 {
            Self::Good
        } else if percent >= 60 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Good => "score score--good",
            Self::Fair => "score score--fair",
            Self::Poor => "score score--poor",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub class: &'static str,
    pub message: &'static str,
}

impl FeedbackVm {
    #[must_use]
    pub fn for_verdict(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Correct => Self {
                class: "feedback feedback--correct",
                message: "🎉 Correct! You read this number right.",
            },
            Verdict::Incorrect => Self {
                class: "feedback feedback--incorrect",
                message: "❌ Not quite. Listen more closely next time.",
            },
        }
    }
}

/// Everything the exercise screen renders for one snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExerciseVm {
    pub tier_title: &'static str,
    pub progress_label: String,
    pub progress_value: u32,
    pub score_label: String,
    pub score_tone: ScoreTone,
    pub number_label: String,
    pub number_class: &'static str,
    pub time_label: String,
    pub controls_enabled: bool,
    pub feedback: Option<FeedbackVm>,
}

impl ExerciseVm {
    #[must_use]
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        let state = &snapshot.state;
        let rounds = state.rounds_completed();
        Self {
            tier_title: snapshot.tier.title(),
            progress_label: format!("Progress: {rounds}/{ROUNDS_PER_SESSION}"),
            progress_value: rounds * 100 / ROUNDS_PER_SESSION,
            score_label: format!("Score: {}/{rounds}", state.score()),
            score_tone: ScoreTone::from_percentage(state.running_percentage()),
            number_label: format_thousands(state.current_number()),
            number_class: if state.last_feedback() == Some(Verdict::Correct) {
                "number-display number-display--correct"
            } else {
                "number-display"
            },
            time_label: format!("Time left: {}s", state.time_remaining()),
            controls_enabled: snapshot.phase == SessionPhase::RoundActive && state.round_active(),
            feedback: state.last_feedback().map(FeedbackVm::for_verdict),
        }
    }
}

/// What a key press on the exercise screen asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    Replay,
    Verdict(Verdict),
}

/// Space replays; `1` or Enter marks correct; `2` marks incorrect.
#[must_use]
pub fn shortcut_for(key: &Key, code: Code) -> Option<Shortcut> {
    if code == Code::Space {
        return Some(Shortcut::Replay);
    }
    match key {
        Key::Enter => Some(Shortcut::Verdict(Verdict::Correct)),
        Key::Character(value) => match value.as_str() {
            "1" => Some(Shortcut::Verdict(Verdict::Correct)),
            "2" => Some(Shortcut::Verdict(Verdict::Incorrect)),
            _ => None,
        },
        _ => None,
    }
}
