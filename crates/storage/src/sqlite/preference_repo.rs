use async_trait::async_trait;
use chrono::Utc;
use reflex_core::model::{THEME_STORAGE_KEY, Theme};
use sqlx::Row;

use crate::repository::{PreferenceRepository, StorageError, parse_theme};

use super::SqliteRepository;

impl SqliteRepository {
    async fn get_value(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM preferences WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        row.try_get::<String, _>("value")
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn put_value(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO preferences (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl PreferenceRepository for SqliteRepository {
    async fn load_theme(&self) -> Result<Option<Theme>, StorageError> {
        self.get_value(THEME_STORAGE_KEY)
            .await?
            .map(|raw| parse_theme(&raw))
            .transpose()
    }

    async fn save_theme(&self, theme: Theme) -> Result<(), StorageError> {
        self.put_value(THEME_STORAGE_KEY, theme.as_str()).await
    }
}
