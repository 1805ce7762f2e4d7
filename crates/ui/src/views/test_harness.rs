use std::sync::Arc;
use std::time::Duration;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use reflex_core::SequenceSource;
use reflex_core::model::{DifficultyTier, ROUNDS_PER_SESSION, SessionSummary};
use reflex_core::time::{fixed_clock, fixed_now};
use services::{SessionLauncher, SpeechAnnouncer, ThemeService};
use storage::Storage;
use storage::repository::PreferenceRepository;

use crate::app::{App, AppShell, ShellTestHandle};
use crate::context::{UiApp, build_app_context};
use crate::views::{DifficultySelectionView, ExerciseTestHandle, ExerciseView, SessionSummaryView};
use crate::vm::map_summary;

#[derive(Clone)]
struct TestApp {
    themes: Arc<ThemeService>,
    sessions: SessionLauncher,
    initial_tier: Option<DifficultyTier>,
}

impl UiApp for TestApp {
    fn themes(&self) -> Arc<ThemeService> {
        Arc::clone(&self.themes)
    }

    fn sessions(&self) -> SessionLauncher {
        self.sessions.clone()
    }

    fn initial_tier(&self) -> Option<DifficultyTier> {
        self.initial_tier
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    App,
    Shell,
    Selector,
    Exercise(DifficultyTier),
    Summary { score: u32, seconds: i64 },
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    exercise: ExerciseTestHandle,
    shell: ShellTestHandle,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewHarnessRoot(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    let exercise = props.exercise.clone();
    use_context_provider(|| exercise);
    let shell = props.shell.clone();
    use_context_provider(|| shell);

    match props.view {
        ViewKind::App => rsx! { App {} },
        ViewKind::Shell => rsx! { AppShell {} },
        ViewKind::Selector => rsx! {
            DifficultySelectionView { on_select: |_| {} }
        },
        ViewKind::Exercise(tier) => rsx! {
            ExerciseView { tier, on_home: |()| {} }
        },
        ViewKind::Summary { score, seconds } => {
            let started = fixed_now();
            let summary = SessionSummary::new(
                DifficultyTier::Beginner,
                score,
                ROUNDS_PER_SESSION,
                started,
                started + chrono::Duration::seconds(seconds),
            )
            .expect("valid summary");
            rsx! {
                SessionSummaryView {
                    summary: map_summary(&summary),
                    on_retry: |()| {},
                    on_home: |()| {},
                }
            }
        }
    }
}

pub struct HarnessOptions {
    pub view: ViewKind,
    pub random: Vec<f64>,
    pub initial_tier: Option<DifficultyTier>,
    pub preferences: Arc<dyn PreferenceRepository>,
}

impl HarnessOptions {
    pub fn new(view: ViewKind) -> Self {
        Self {
            view,
            random: vec![0.5],
            initial_tier: None,
            preferences: Storage::in_memory().preferences,
        }
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub exercise: ExerciseTestHandle,
    pub shell: ShellTestHandle,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(Duration::from_millis(50), self.dom.wait_for_work()).await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive until the rendered html contains `needle`, or give up.
    pub async fn drive_until(&mut self, needle: &str) -> String {
        for _ in 0..20 {
            let html = self.render();
            if html.contains(needle) {
                return html;
            }
            self.drive_async().await;
        }
        self.render()
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with(HarnessOptions::new(view))
}

pub fn setup_view_harness_with(options: HarnessOptions) -> ViewHarness {
    let random = options.random;
    let sessions = SessionLauncher::new(fixed_clock(), SpeechAnnouncer::silent())
        .with_random_source(move || Box::new(SequenceSource::new(random.clone())));
    let app = Arc::new(TestApp {
        themes: Arc::new(ThemeService::new(options.preferences)),
        sessions,
        initial_tier: options.initial_tier,
    });
    let exercise = ExerciseTestHandle::default();
    let shell = ShellTestHandle::default();

    let dom = VirtualDom::new_with_props(
        ViewHarnessRoot,
        ViewHarnessProps {
            app,
            view: options.view,
            exercise: exercise.clone(),
            shell: shell.clone(),
        },
    );

    ViewHarness { dom, exercise, shell }
}
