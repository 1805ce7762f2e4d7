use async_trait::async_trait;
use reflex_core::model::{THEME_STORAGE_KEY, Theme};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the learner's cosmetic preferences.
///
/// Only the theme is persisted; sessions and scores never leave memory.
#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    /// Fetch the stored theme, if one was ever saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored value is not a known
    /// theme, or other storage errors.
    async fn load_theme(&self) -> Result<Option<Theme>, StorageError>;

    /// Persist the theme, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn save_theme(&self, theme: Theme) -> Result<(), StorageError>;
}

pub(crate) fn parse_theme(raw: &str) -> Result<Theme, StorageError> {
    raw.parse::<Theme>()
        .map_err(|err| StorageError::Serialization(err.to_string()))
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// Values are kept as raw strings under their preference key, the same shape
/// the `SQLite` adapter stores.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Seed a raw preference value, bypassing validation.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[async_trait]
impl PreferenceRepository for InMemoryRepository {
    async fn load_theme(&self) -> Result<Option<Theme>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .get(THEME_STORAGE_KEY)
            .map(|raw| parse_theme(raw))
            .transpose()
    }

    async fn save_theme(&self, theme: Theme) -> Result<(), StorageError> {
        self.insert_raw(THEME_STORAGE_KEY, theme.as_str())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub preferences: Arc<dyn PreferenceRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let preferences: Arc<dyn PreferenceRepository> = Arc::new(repo);
        Self { preferences }
    }
}
