use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use reflex_core::model::DifficultyTier;
use services::{SessionLauncher, ThemeService};

pub trait UiApp: Send + Sync {
    fn themes(&self) -> Arc<ThemeService>;
    fn sessions(&self) -> SessionLauncher;

    /// Tier to open straight into, skipping the selector on first render.
    fn initial_tier(&self) -> Option<DifficultyTier> {
        None
    }
}

#[derive(Clone)]
pub struct AppContext {
    themes: Arc<ThemeService>,
    sessions: SessionLauncher,
    initial_tier: Option<DifficultyTier>,
    initial_tier_pending: Arc<AtomicBool>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let initial_tier = app.initial_tier();
        Self {
            themes: app.themes(),
            sessions: app.sessions(),
            initial_tier,
            initial_tier_pending: Arc::new(AtomicBool::new(initial_tier.is_some())),
        }
    }

    #[must_use]
    pub fn themes(&self) -> Arc<ThemeService> {
        Arc::clone(&self.themes)
    }

    #[must_use]
    pub fn sessions(&self) -> SessionLauncher {
        self.sessions.clone()
    }

    /// The configured tier, handed out once. Returning home never re-enters it.
    #[must_use]
    pub fn take_initial_tier(&self) -> Option<DifficultyTier> {
        if self.initial_tier_pending.swap(false, Ordering::AcqRel) {
            self.initial_tier
        } else {
            None
        }
    }
}

// Provided by the composition root (`crates/app`) or the view test harness.

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
