use reflex_core::model::DifficultyTier;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TierCardVm {
    pub tier: DifficultyTier,
    pub title: &'static str,
    pub description: &'static str,
    pub examples_label: String,
    pub class: String,
    pub button_id: String,
}

#[must_use]
pub fn tier_cards() -> Vec<TierCardVm> {
    DifficultyTier::ALL
        .iter()
        .map(|&tier| TierCardVm {
            tier,
            title: tier.title(),
            description: tier.description(),
            examples_label: format!("Examples: {}", tier.examples()),
            class: format!("tier-card tier-card--{}", tier.as_str()),
            button_id: format!("tier-{}", tier.as_str()),
        })
        .collect()
}
