use dioxus::prelude::*;
use reflex_core::model::DifficultyTier;

use crate::vm::{TierCardVm, tier_cards};

#[component]
pub fn DifficultySelectionView(on_select: EventHandler<DifficultyTier>) -> Element {
    let cards = tier_cards();

    rsx! {
        div { class: "page selector",
            div { class: "selector__intro",
                h2 { "Choose a Difficulty" }
                p { class: "muted", "Start at the level that matches where you are." }
            }
            div { class: "selector__grid",
                for card in cards {
                    TierCard { key: "{card.tier}", card: card.clone(), on_select }
                }
            }
            section { class: "selector__about",
                h2 { "Why practice number reflexes?" }
                p {
                    "Reading English numbers fluently matters in everyday conversation, "
                    "at work and while studying. This drill helps you:"
                }
                ul {
                    li { "React faster when you hear English numbers" }
                    li { "Hear accurate pronunciation through text-to-speech" }
                    li { "Talk about figures with more confidence" }
                    li { "Train a natural ear for spoken English" }
                }
            }
        }
    }
}

#[component]
fn TierCard(card: TierCardVm, on_select: EventHandler<DifficultyTier>) -> Element {
    let tier = card.tier;

    rsx! {
        div { class: "{card.class}", onclick: move |_| on_select.call(tier),
            h3 { class: "tier-card__title", "{card.title}" }
            p { class: "tier-card__description", "{card.description}" }
            span { class: "badge", "{card.examples_label}" }
            button {
                class: "btn btn-primary",
                id: "{card.button_id}",
                r#type: "button",
                "Start Practice"
            }
        }
    }
}
