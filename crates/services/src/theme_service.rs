use std::sync::Arc;

use reflex_core::model::Theme;
use storage::repository::{PreferenceRepository, StorageError};

use crate::error::ThemeServiceError;

#[derive(Clone)]
pub struct ThemeService {
    repo: Arc<dyn PreferenceRepository>,
}

impl ThemeService {
    #[must_use]
    pub fn new(repo: Arc<dyn PreferenceRepository>) -> Self {
        Self { repo }
    }

    /// Load the persisted theme, or the default if none (or garbage) is stored.
    ///
    /// # Errors
    ///
    /// Returns `ThemeServiceError` on storage failures.
    pub async fn load(&self) -> Result<Theme, ThemeServiceError> {
        match self.repo.load_theme().await {
            Ok(theme) => Ok(theme.unwrap_or_default()),
            Err(StorageError::Serialization(reason)) => {
                tracing::warn!(%reason, "ignoring unreadable theme preference");
                Ok(Theme::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Persist and return the opposite of `current`.
    ///
    /// # Errors
    ///
    /// Returns `ThemeServiceError` if persistence fails.
    pub async fn toggle(&self, current: Theme) -> Result<Theme, ThemeServiceError> {
        let next = current.toggle();
        self.repo.save_theme(next).await?;
        tracing::debug!(theme = %next, "theme switched");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reflex_core::model::THEME_STORAGE_KEY;
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn load_defaults_to_light() {
        let service = ThemeService::new(Arc::new(InMemoryRepository::new()));
        assert_eq!(service.load().await.unwrap(), Theme::Light);
    }

    #[tokio::test]
    async fn toggle_persists_next_theme() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = ThemeService::new(repo.clone());

        let next = service.toggle(Theme::Light).await.unwrap();

        assert_eq!(next, Theme::Dark);
        assert_eq!(service.load().await.unwrap(), Theme::Dark);
    }

    #[tokio::test]
    async fn unreadable_value_falls_back_to_default() {
        let repo = InMemoryRepository::new();
        repo.insert_raw(THEME_STORAGE_KEY, "neon").unwrap();
        let service = ThemeService::new(Arc::new(repo));

        assert_eq!(service.load().await.unwrap(), Theme::Light);
    }

    struct FailingRepo;

    #[async_trait::async_trait]
    impl PreferenceRepository for FailingRepo {
        async fn load_theme(&self) -> Result<Option<Theme>, StorageError> {
            Err(StorageError::Connection("fail".to_string()))
        }

        async fn save_theme(&self, _theme: Theme) -> Result<(), StorageError> {
            Err(StorageError::Connection("fail".to_string()))
        }
    }

    #[tokio::test]
    async fn storage_failures_surface() {
        let service = ThemeService::new(Arc::new(FailingRepo));
        assert!(service.load().await.is_err());
        assert!(service.toggle(Theme::Dark).await.is_err());
    }
}
