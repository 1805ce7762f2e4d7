use dioxus::prelude::*;

use crate::vm::SummaryVm;

#[component]
pub fn SessionSummaryView(
    summary: SummaryVm,
    on_retry: EventHandler<()>,
    on_home: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "card summary",
            h2 { class: "summary__title", "Exercise Complete!" }
            div { class: "summary__emoji", "{summary.emoji}" }
            p { class: "summary__percentage", "{summary.percentage_label}" }
            // Definition list reads well for label/value pairs.
            dl { class: "summary__details",
                dt { "Result" }
                dd { "{summary.detail}" }

                dt { "Level" }
                dd { "{summary.tier_title}" }

                dt { "Duration" }
                dd { "{summary.elapsed_label}" }
            }
            div { class: "summary__actions",
                button {
                    class: "btn btn-primary",
                    id: "summary-retry",
                    r#type: "button",
                    onclick: move |_| on_retry.call(()),
                    "Try Again"
                }
                button {
                    class: "btn btn-secondary",
                    id: "summary-home",
                    r#type: "button",
                    onclick: move |_| on_home.call(()),
                    "Home"
                }
            }
        }
    }
}
