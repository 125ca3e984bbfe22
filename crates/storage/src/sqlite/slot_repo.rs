use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::repository::{ProgressSlotRepository, StorageError};

use super::SqliteRepository;

#[async_trait]
impl ProgressSlotRepository for SqliteRepository {
    async fn read_slot(&self, slot: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT payload
            FROM progress_slots
            WHERE slot = ?1
            ",
        )
        .bind(slot)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let payload: String = row
            .try_get("payload")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        Ok(Some(payload))
    }

    async fn write_slot(&self, slot: &str, payload: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO progress_slots (slot, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(slot) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            ",
        )
        .bind(slot)
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn delete_slot(&self, slot: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM progress_slots WHERE slot = ?1")
            .bind(slot)
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
