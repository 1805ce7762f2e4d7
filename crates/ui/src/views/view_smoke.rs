use std::sync::Arc;

use reflex_core::model::{DifficultyTier, THEME_STORAGE_KEY, Theme, Verdict};
use storage::repository::{InMemoryRepository, PreferenceRepository, StorageError};

use super::test_harness::{HarnessOptions, ViewKind, setup_view_harness, setup_view_harness_with};

#[tokio::test(flavor = "current_thread")]
async fn selector_lists_every_tier() {
    let mut harness = setup_view_harness(ViewKind::Selector);
    harness.rebuild();
    let html = harness.render();

    for needle in [
        "Choose a Difficulty",
        "Beginner",
        "Numbers from 1 to 10",
        "Intermediate",
        "Examples: 23, 67, 89, 100",
        "Advanced",
        "tier-advanced",
    ] {
        assert!(html.contains(needle), "missing {needle} in {html}");
    }
}

#[tokio::test(flavor = "current_thread")]
async fn shell_without_tier_shows_selector() {
    let mut harness = setup_view_harness(ViewKind::Shell);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Choose a Difficulty"), "missing selector in {html}");
    assert!(!html.contains("exercise-root"), "unexpected exercise in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn shell_with_initial_tier_opens_exercise() {
    let mut options = HarnessOptions::new(ViewKind::Shell);
    options.initial_tier = Some(DifficultyTier::Beginner);
    let mut harness = setup_view_harness_with(options);
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("exercise-root"), "missing exercise in {html}");
    assert!(html.contains("Progress: 0/10"), "missing progress in {html}");
    assert!(html.contains("Time left: 5s"), "missing timer in {html}");
    assert!(html.contains(">6<"), "missing number in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn shell_opens_exercise_and_home_stops_the_session() {
    let mut harness = setup_view_harness(ViewKind::Shell);
    harness.rebuild();

    harness.shell.navigate().call(Some(DifficultyTier::Beginner));
    let html = harness.drive_until("exercise-root").await;
    assert!(html.contains("exercise-root"), "missing exercise in {html}");
    assert!(html.contains(">6<"), "missing number in {html}");

    let updates = harness.exercise.handle().subscribe();
    harness.shell.navigate().call(None);
    let html = harness.drive_until("Choose a Difficulty").await;
    assert!(html.contains("Choose a Difficulty"), "missing selector in {html}");
    assert!(!html.contains("exercise-root"), "exercise still mounted in {html}");

    // The loop drops its snapshot sender once it has stopped.
    for _ in 0..20 {
        if updates.has_changed().is_err() {
            break;
        }
        harness.drive_async().await;
    }
    assert!(updates.has_changed().is_err(), "session loop still running");
}

#[tokio::test(flavor = "current_thread")]
async fn exercise_formats_large_numbers() {
    let mut harness = setup_view_harness(ViewKind::Exercise(DifficultyTier::Advanced));
    harness.rebuild();
    let html = harness.render();

    // floor(0.5 * 999900) + 100
    assert!(html.contains("500,050"), "missing number in {html}");
    assert!(html.contains("Advanced"), "missing tier badge in {html}");
    assert!(html.contains("Listen Again"), "missing replay in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn verdict_shows_feedback_and_score() {
    let mut harness = setup_view_harness(ViewKind::Exercise(DifficultyTier::Intermediate));
    harness.rebuild();

    harness.exercise.handle().verdict(Verdict::Correct);
    let html = harness.drive_until("Score: 1/1").await;

    assert!(html.contains("Score: 1/1"), "missing score in {html}");
    assert!(html.contains("Progress: 1/10"), "missing progress in {html}");
    assert!(html.contains("feedback--correct"), "missing feedback in {html}");
    assert!(html.contains("disabled"), "controls still enabled in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn app_applies_default_theme_and_header() {
    let mut harness = setup_view_harness(ViewKind::App);
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("theme-light"), "missing theme class in {html}");
    assert!(html.contains("Reflex Practice"), "missing title in {html}");
    assert!(html.contains("theme-toggle"), "missing toggle in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn app_restores_stored_theme() {
    let repo = InMemoryRepository::new();
    repo.insert_raw(THEME_STORAGE_KEY, "dark").unwrap();
    let mut options = HarnessOptions::new(ViewKind::App);
    options.preferences = Arc::new(repo);
    let mut harness = setup_view_harness_with(options);
    harness.rebuild();

    let html = harness.drive_until("theme-dark").await;
    assert!(html.contains("theme-dark"), "missing stored theme in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn summary_shows_percentage_and_actions() {
    let mut harness = setup_view_harness(ViewKind::Summary {
        score: 7,
        seconds: 65,
    });
    harness.rebuild();
    let html = harness.render();

    for needle in [
        "Exercise Complete!",
        "👍",
        "70%",
        "You got 7/10 right",
        "1m 05s",
        "Try Again",
        "Home",
    ] {
        assert!(html.contains(needle), "missing {needle} in {html}");
    }
}

struct FailingPreferences;

#[async_trait::async_trait]
impl PreferenceRepository for FailingPreferences {
    async fn load_theme(&self) -> Result<Option<Theme>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn save_theme(&self, _theme: Theme) -> Result<(), StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn app_falls_back_to_light_when_preferences_fail() {
    let mut options = HarnessOptions::new(ViewKind::App);
    options.preferences = Arc::new(FailingPreferences);
    let mut harness = setup_view_harness_with(options);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();

    assert!(html.contains("theme-light"), "missing fallback theme in {html}");
    assert!(html.contains("Choose a Difficulty"), "missing selector in {html}");
}
