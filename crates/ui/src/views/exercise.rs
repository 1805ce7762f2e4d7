use dioxus::document::eval;
use dioxus::prelude::*;
use reflex_core::model::{DifficultyTier, Verdict};
use services::{SessionHandle, SessionLaunch, SessionSnapshot};
use tokio::sync::watch;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

use crate::context::AppContext;
use crate::views::{SessionSummaryView, ViewError};
use crate::vm::{ExerciseVm, Shortcut, map_summary, shortcut_for};

fn launch_session(ctx: &AppContext, tier: DifficultyTier) -> Result<SessionHandle, ViewError> {
    let SessionLaunch {
        handle,
        session_loop,
    } = ctx.sessions().launch(tier).map_err(|err| {
        tracing::error!(%err, %tier, "could not start session");
        ViewError::SessionUnavailable
    })?;
    // Scoped to this view: unmounting drops the loop with it.
    spawn(session_loop.run());
    Ok(handle)
}

async fn follow_snapshots(
    mut updates: watch::Receiver<SessionSnapshot>,
    mut snapshot: Signal<Option<SessionSnapshot>>,
) {
    while updates.changed().await.is_ok() {
        let next = updates.borrow_and_update().clone();
        snapshot.set(Some(next));
    }
}

#[component]
pub fn ExerciseView(tier: DifficultyTier, on_home: EventHandler<()>) -> Element {
    let ctx = use_context::<AppContext>();
    let launched = use_hook(move || launch_session(&ctx, tier));
    let handle = launched.as_ref().ok().cloned();
    let snapshot = use_signal(|| handle.as_ref().map(SessionHandle::snapshot));

    let follower = handle.clone();
    use_future(move || {
        let follower = follower.clone();
        async move {
            if let Some(follower) = follower {
                follow_snapshots(follower.subscribe(), snapshot).await;
            }
        }
    });

    let on_unmount = handle.clone();
    use_drop(move || {
        if let Some(handle) = on_unmount {
            handle.shutdown();
        }
    });

    use_effect(move || {
        let _ = eval(r#"document.getElementById("exercise-root")?.focus();"#);
    });

    #[cfg(test)]
    {
        if let (Some(handles), Some(handle)) = (try_consume_context::<ExerciseTestHandle>(), handle.as_ref()) {
            handles.register(handle.clone());
        }
    }

    let commands = handle.clone();
    let submit = use_callback(move |verdict: Verdict| {
        if let Some(handle) = commands.as_ref() {
            handle.verdict(verdict);
        }
    });
    let commands = handle.clone();
    let replay = use_callback(move |()| {
        if let Some(handle) = commands.as_ref() {
            handle.replay();
        }
    });
    let commands = handle.clone();
    let retry = use_callback(move |()| {
        if let Some(handle) = commands.as_ref() {
            handle.retry();
        }
    });

    let on_key = move |evt: KeyboardEvent| {
        let Some(shortcut) = shortcut_for(&evt.data.key(), evt.data.code()) else {
            return;
        };
        evt.prevent_default();
        match shortcut {
            Shortcut::Replay => replay.call(()),
            Shortcut::Verdict(verdict) => submit.call(verdict),
        }
    };

    if let Err(err) = launched {
        return rsx! {
            div { class: "page exercise",
                p { class: "error", "{err.message()}" }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_home.call(()),
                    "Home"
                }
            }
        };
    }

    let snapshot_guard = snapshot.read();
    let Some(current) = snapshot_guard.as_ref() else {
        return rsx! {
            div { class: "page exercise", p { "Loading..." } }
        };
    };

    if let Some(summary) = current.summary.as_ref() {
        return rsx! {
            div { class: "page exercise",
                SessionSummaryView {
                    summary: map_summary(summary),
                    on_retry: move |()| retry.call(()),
                    on_home: move |()| on_home.call(()),
                }
            }
        };
    }

    let vm = ExerciseVm::from_snapshot(current);
    let disabled = !vm.controls_enabled;

    rsx! {
        div {
            class: "page exercise",
            id: "exercise-root",
            tabindex: "0",
            onkeydown: on_key,
            div { class: "exercise__top",
                button {
                    class: "btn btn-ghost",
                    id: "exercise-home",
                    r#type: "button",
                    onclick: move |_| on_home.call(()),
                    "Home"
                }
                span { class: "badge", "{vm.tier_title}" }
            }
            div { class: "card exercise__progress",
                div { class: "exercise__progress-row",
                    span { "{vm.progress_label}" }
                    span { class: "{vm.score_tone.class()}", "{vm.score_label}" }
                }
                progress { max: "100", value: "{vm.progress_value}" }
            }
            div { class: "card exercise__main",
                h3 { class: "exercise__question", "What is the current number?" }
                p { class: "muted", id: "exercise-time", "{vm.time_label}" }
                div { class: "{vm.number_class}", "{vm.number_label}" }
                button {
                    class: "btn btn-outline btn-wide",
                    id: "exercise-replay",
                    r#type: "button",
                    disabled,
                    onclick: move |_| replay.call(()),
                    "🔊 Listen Again"
                }
                div { class: "exercise__verdicts",
                    button {
                        class: "btn btn-correct",
                        id: "exercise-correct",
                        r#type: "button",
                        disabled,
                        onclick: move |_| submit.call(Verdict::Correct),
                        "✔ Correct"
                    }
                    button {
                        class: "btn btn-incorrect",
                        id: "exercise-incorrect",
                        r#type: "button",
                        disabled,
                        onclick: move |_| submit.call(Verdict::Incorrect),
                        "✘ Incorrect"
                    }
                }
                if let Some(feedback) = vm.feedback.as_ref() {
                    div { class: "{feedback.class}", "{feedback.message}" }
                }
            }
            div { class: "card exercise__help muted",
                p { class: "exercise__help-title", "How it works:" }
                ul {
                    li { "Look at the number on screen" }
                    li { "Press \"Listen Again\" (Space) to hear it" }
                    li { "Choose \"Correct\" (1 or Enter) if you read it right" }
                    li { "Choose \"Incorrect\" (2) if you did not" }
                }
            }
        }
    }
}

/// Test hook: exposes the running session's handle to view smoke tests.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct ExerciseTestHandle {
    handle: Rc<RefCell<Option<SessionHandle>>>,
}

#[cfg(test)]
impl ExerciseTestHandle {
    pub(crate) fn register(&self, handle: SessionHandle) {
        *self.handle.borrow_mut() = Some(handle);
    }

    pub(crate) fn handle(&self) -> SessionHandle {
        self.handle
            .borrow()
            .clone()
            .expect("exercise handle registered")
    }
}
