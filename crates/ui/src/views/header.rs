use dioxus::prelude::*;
use reflex_core::model::Theme;

#[component]
pub fn Header(theme: Theme, on_toggle_theme: EventHandler<()>) -> Element {
    let (icon, label) = match theme {
        Theme::Light => ("🌙", "Switch to dark mode"),
        Theme::Dark => ("☀️", "Switch to light mode"),
    };

    rsx! {
        header { class: "app-header",
            div { class: "app-header__brand",
                div { class: "app-header__logo", "🔊" }
                div {
                    h1 { class: "app-header__title", "Reflex Practice" }
                    p { class: "app-header__subtitle", "Reading English Numbers" }
                }
            }
            button {
                class: "app-header__theme",
                id: "theme-toggle",
                r#type: "button",
                title: "{label}",
                onclick: move |_| on_toggle_theme.call(()),
                span { aria_hidden: "true", "{icon}" }
                span { class: "sr-only", "{label}" }
            }
        }
    }
}
