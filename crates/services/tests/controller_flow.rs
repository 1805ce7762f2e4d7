use std::sync::{Arc, Mutex};
use std::time::Duration;

use reflex_core::SequenceSource;
use reflex_core::model::{DifficultyTier, SessionPhase, SessionState, Verdict};
use reflex_core::time::fixed_clock;
use services::{
    ExerciseSession, ManualScheduler, SessionError, SessionLauncher, SessionTiming,
    SpeechAnnouncer, SpeechSettings, SpeechSink, Utterance,
};

const FEEDBACK: Duration = Duration::from_millis(1500);

#[derive(Default)]
struct RecordingSink {
    spoken: Mutex<Vec<Utterance>>,
}

impl RecordingSink {
    fn texts(&self) -> Vec<String> {
        self.spoken
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.text.clone())
            .collect()
    }
}

impl SpeechSink for RecordingSink {
    fn speak(&self, utterance: &Utterance) {
        self.spoken.lock().unwrap().push(utterance.clone());
    }
}

struct Fixture {
    session: ExerciseSession,
    scheduler: Arc<ManualScheduler>,
    sink: Arc<RecordingSink>,
}

impl Fixture {
    fn advance(&mut self, by: Duration) {
        self.scheduler.advance(by, &mut self.session).unwrap();
    }

    fn state(&self) -> &SessionState {
        self.session.state()
    }
}

fn fixture(tier: DifficultyTier, values: Vec<f64>) -> Fixture {
    let sink = Arc::new(RecordingSink::default());
    let announcer = SpeechAnnouncer::new(SpeechSettings::default(), sink.clone());
    let launcher = SessionLauncher::new(fixed_clock(), announcer)
        .with_random_source(move || Box::new(SequenceSource::new(values.clone())));
    let scheduler = Arc::new(ManualScheduler::new());
    let session = launcher.controller(tier, scheduler.clone());
    Fixture {
        session,
        scheduler,
        sink,
    }
}

fn started(tier: DifficultyTier, values: Vec<f64>) -> Fixture {
    let mut fx = fixture(tier, values);
    fx.session.start().unwrap();
    fx
}

#[test]
fn new_session_is_idle_until_started() {
    let fx = fixture(DifficultyTier::Beginner, vec![0.5]);
    assert_eq!(fx.session.phase(), SessionPhase::Idle);
    assert_eq!(fx.scheduler.pending(), 0);
}

#[test]
fn start_arms_timer_and_shows_first_number() {
    let fx = started(DifficultyTier::Beginner, vec![0.5]);

    assert_eq!(fx.session.phase(), SessionPhase::RoundActive);
    assert_eq!(fx.state().current_number(), 6);
    assert_eq!(fx.state().time_remaining(), 5);
    assert!(fx.state().round_active());
    assert_eq!(fx.state().last_feedback(), None);
    assert!(fx.session.timer_armed());
}

#[test]
fn beginner_rounds_follow_the_random_sequence() {
    let mut fx = started(DifficultyTier::Beginner, vec![0.0, 0.99, 0.5]);
    let mut numbers = vec![fx.state().current_number()];
    for _ in 0..2 {
        fx.session.submit(Verdict::Correct);
        fx.advance(FEEDBACK);
        numbers.push(fx.state().current_number());
    }

    assert_eq!(numbers, vec![1, 10, 6]);
}

#[test]
fn number_is_spoken_after_the_announce_delay() {
    let mut fx = started(DifficultyTier::Beginner, vec![0.0]);

    fx.advance(Duration::from_millis(499));
    assert!(fx.sink.texts().is_empty());

    fx.advance(Duration::from_millis(1));
    assert_eq!(fx.sink.texts(), vec!["1".to_string()]);
    assert_eq!(fx.scheduler.now(), Duration::from_millis(500));
}

#[test]
fn custom_timing_drives_the_same_machine() {
    let timing = SessionTiming {
        tick_interval: Duration::from_millis(100),
        announce_delay: Duration::ZERO,
        feedback_delay: Duration::from_millis(200),
    };
    let launcher = SessionLauncher::new(fixed_clock(), SpeechAnnouncer::silent())
        .with_random_source(|| Box::new(SequenceSource::new(vec![0.5])))
        .with_timing(timing);
    let scheduler = Arc::new(ManualScheduler::new());
    let mut session = launcher.controller(DifficultyTier::Beginner, scheduler.clone());
    session.start().unwrap();

    // Five fast ticks time the round out, then a short pause moves on.
    scheduler.advance(Duration::from_millis(500), &mut session).unwrap();
    assert_eq!(session.phase(), SessionPhase::RoundFeedback);
    scheduler.advance(Duration::from_millis(200), &mut session).unwrap();
    assert_eq!(session.phase(), SessionPhase::RoundActive);
    assert_eq!(session.state().rounds_completed(), 1);
}

#[test]
fn replay_only_while_round_is_active() {
    let mut fx = started(DifficultyTier::Intermediate, vec![0.42]);

    assert!(fx.session.replay());
    assert_eq!(fx.sink.texts(), vec!["43".to_string()]);

    fx.session.submit(Verdict::Incorrect);
    assert!(!fx.session.replay());
    assert_eq!(fx.sink.texts().len(), 1);
}

#[test]
fn ten_correct_verdicts_complete_with_full_marks() {
    let mut fx = started(DifficultyTier::Advanced, vec![0.1, 0.7, 0.3]);

    for _ in 0..10 {
        assert!(fx.session.submit(Verdict::Correct));
        fx.advance(FEEDBACK);
    }

    assert_eq!(fx.session.phase(), SessionPhase::SessionComplete);
    assert!(fx.state().is_complete());
    assert_eq!(fx.state().score(), 10);
    assert_eq!(fx.state().rounds_completed(), 10);
    let summary = fx.session.summary().expect("summary after last round");
    assert_eq!(summary.final_percentage(), 100);
    assert_eq!(summary.tier(), DifficultyTier::Advanced);
}

#[test]
fn final_percentage_is_rounded_score_over_ten() {
    let mut fx = started(DifficultyTier::Beginner, vec![0.5]);
    let pattern = [true, false, true, true, false, true, true, false, true, false];

    for correct in pattern {
        let verdict = if correct {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        };
        fx.session.submit(verdict);
        fx.advance(FEEDBACK);
    }

    let summary = fx.session.summary().expect("summary");
    assert_eq!(summary.score(), 6);
    assert_eq!(summary.final_percentage(), 60);
}

#[test]
fn timeout_counts_as_incorrect() {
    let mut timed_out = started(DifficultyTier::Beginner, vec![0.5]);
    let mut answered = started(DifficultyTier::Beginner, vec![0.5]);

    timed_out.advance(Duration::from_millis(4_900));
    assert!(timed_out.state().round_active());
    assert_eq!(timed_out.state().time_remaining(), 1);

    timed_out.advance(Duration::from_millis(100));
    answered.session.submit(Verdict::Incorrect);

    assert_eq!(timed_out.session.phase(), SessionPhase::RoundFeedback);
    assert_eq!(timed_out.state().time_remaining(), 0);
    assert!(!timed_out.session.timer_armed());
    for fx in [&timed_out, &answered] {
        assert_eq!(fx.state().score(), 0);
        assert_eq!(fx.state().rounds_completed(), 1);
        assert_eq!(fx.state().last_feedback(), Some(Verdict::Incorrect));
        assert!(!fx.state().round_active());
    }
}

#[test]
fn timed_out_round_advances_after_feedback() {
    let mut fx = started(DifficultyTier::Beginner, vec![0.0, 0.99]);

    fx.advance(Duration::from_secs(5));
    fx.advance(FEEDBACK);

    assert_eq!(fx.session.phase(), SessionPhase::RoundActive);
    assert_eq!(fx.state().current_number(), 10);
    assert_eq!(fx.state().time_remaining(), 5);
}

#[test]
fn verdict_cancels_pending_timeout() {
    let mut fx = started(DifficultyTier::Beginner, vec![0.5]);
    fx.advance(Duration::from_secs(3));
    fx.session.submit(Verdict::Correct);

    // The old tick at t=4s must not touch the closed round.
    fx.advance(Duration::from_secs(1));
    assert_eq!(fx.state().last_feedback(), Some(Verdict::Correct));
    assert_eq!(fx.state().score(), 1);
    assert_eq!(fx.state().rounds_completed(), 1);
    assert_eq!(fx.state().time_remaining(), 2);

    fx.advance(Duration::from_millis(500));
    assert_eq!(fx.session.phase(), SessionPhase::RoundActive);
    assert_eq!(fx.state().time_remaining(), 5);
}

#[test]
fn late_verdict_changes_nothing() {
    let mut fx = started(DifficultyTier::Beginner, vec![0.5]);
    fx.session.submit(Verdict::Incorrect);
    let before = fx.session.snapshot();

    assert!(!fx.session.submit(Verdict::Correct));
    assert!(!fx.session.submit(Verdict::Incorrect));

    assert_eq!(fx.session.snapshot(), before);
}

#[test]
fn verdicts_after_completion_are_ignored() {
    let mut fx = started(DifficultyTier::Beginner, vec![0.5]);
    for _ in 0..10 {
        fx.session.submit(Verdict::Incorrect);
        fx.advance(FEEDBACK);
    }
    let before = fx.session.snapshot();

    assert!(!fx.session.submit(Verdict::Correct));
    fx.advance(Duration::from_secs(30));

    assert_eq!(fx.session.snapshot(), before);
    assert_eq!(before.summary.map(|s| s.final_percentage()), Some(0));
}

#[test]
fn retry_resets_counters_and_draws_a_fresh_number() {
    let mut fx = started(DifficultyTier::Beginner, vec![0.0, 0.99, 0.5]);
    for _ in 0..10 {
        fx.session.submit(Verdict::Correct);
        fx.advance(FEEDBACK);
    }
    assert_eq!(fx.session.phase(), SessionPhase::SessionComplete);

    fx.session.retry().unwrap();

    assert_eq!(fx.session.phase(), SessionPhase::RoundActive);
    assert_eq!(fx.state().score(), 0);
    assert_eq!(fx.state().rounds_completed(), 0);
    assert!(!fx.state().is_complete());
    assert!(fx.session.summary().is_none());
    // Eleventh draw from the cycling sequence.
    assert_eq!(fx.state().current_number(), 10);
}

#[test]
fn lifecycle_misuse_is_rejected() {
    let mut fx = started(DifficultyTier::Beginner, vec![0.5]);

    assert!(matches!(fx.session.start(), Err(SessionError::AlreadyStarted)));
    assert!(matches!(fx.session.retry(), Err(SessionError::NotComplete)));
}

#[test]
fn teardown_stops_everything_pending() {
    let mut fx = started(DifficultyTier::Beginner, vec![0.5]);
    fx.advance(Duration::from_secs(2));
    let spoken = fx.sink.texts().len();

    fx.session.teardown();
    fx.advance(Duration::from_secs(30));

    assert_eq!(fx.session.phase(), SessionPhase::Idle);
    assert_eq!(fx.state(), &SessionState::default());
    assert!(!fx.session.timer_armed());
    assert_eq!(fx.sink.texts().len(), spoken);
}

#[test]
fn score_never_exceeds_rounds_played() {
    let mut fx = started(DifficultyTier::Intermediate, vec![0.13, 0.57, 0.91, 0.02]);
    let mut step = 0_u32;
    while fx.session.phase() != SessionPhase::SessionComplete {
        match step % 3 {
            0 => {
                fx.session.submit(Verdict::Correct);
            }
            1 => {
                fx.session.submit(Verdict::Incorrect);
            }
            _ => fx.advance(Duration::from_secs(5)),
        }
        assert!(fx.state().score() <= fx.state().rounds_completed());
        fx.advance(FEEDBACK);
        assert!(fx.state().score() <= fx.state().rounds_completed());
        assert!(fx.state().rounds_completed() <= 10);
        step += 1;
    }

    assert_eq!(fx.state().rounds_completed(), 10);
}
