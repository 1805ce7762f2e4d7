use dioxus::prelude::*;
use reflex_core::model::{DifficultyTier, Theme};

use crate::context::AppContext;
use crate::views::{DifficultySelectionView, ExerciseView, Header};

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let mut theme = use_signal(Theme::default);

    let themes = ctx.themes();
    use_future(move || {
        let themes = themes.clone();
        async move {
            match themes.load().await {
                Ok(stored) => theme.set(stored),
                Err(err) => tracing::warn!(%err, "theme preference unavailable; using default"),
            }
        }
    });

    let themes = ctx.themes();
    let toggle_theme = move |()| {
        let themes = themes.clone();
        let current = theme();
        spawn(async move {
            let next = themes.toggle(current).await.unwrap_or_else(|err| {
                // Switch anyway; only persistence failed.
                tracing::warn!(%err, "could not save theme preference");
                current.toggle()
            });
            theme.set(next);
        });
    };

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        document::Title { "Reflex Practice" }

        // A single root container carries the theme class for CSS hooks.
        div { class: "app-root theme-{theme}",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Header { theme: theme(), on_toggle_theme: toggle_theme }
                AppShell {}
            }
        }
    }
}

/// Holds the selected tier: the selector without one, the exercise with one.
#[component]
pub fn AppShell() -> Element {
    let ctx = use_context::<AppContext>();
    let mut selected = use_signal(|| ctx.take_initial_tier());
    let navigate = use_callback(move |tier: Option<DifficultyTier>| selected.set(tier));

    #[cfg(test)]
    {
        if let Some(handles) = try_consume_context::<ShellTestHandle>() {
            handles.register(navigate);
        }
    }

    rsx! {
        main { class: "app-main",
            match selected() {
                None => rsx! {
                    DifficultySelectionView {
                        on_select: move |tier: DifficultyTier| navigate.call(Some(tier)),
                    }
                },
                Some(tier) => rsx! {
                    ExerciseView {
                        key: "{tier}",
                        tier,
                        on_home: move |()| navigate.call(None),
                    }
                },
            }
        }
    }
}

/// Test hook: lets view smoke tests pick a tier or go home.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct ShellTestHandle {
    navigate: std::rc::Rc<std::cell::RefCell<Option<Callback<Option<DifficultyTier>>>>>,
}

#[cfg(test)]
impl ShellTestHandle {
    pub(crate) fn register(&self, navigate: Callback<Option<DifficultyTier>>) {
        *self.navigate.borrow_mut() = Some(navigate);
    }

    pub(crate) fn navigate(&self) -> Callback<Option<DifficultyTier>> {
        (*self.navigate.borrow()).expect("shell navigation registered")
    }
}
