use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Name of the slot that holds the learner's progress snapshot.
pub const PROGRESS_SLOT: &str = "home-learning-progress";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Repository contract for named key-value slots holding serialized snapshots.
#[async_trait]
pub trait ProgressSlotRepository: Send + Sync {
    /// Read the payload stored in `slot`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read. A missing slot is `Ok(None)`.
    async fn read_slot(&self, slot: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite `slot` with `payload`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the payload cannot be stored.
    async fn write_slot(&self, slot: &str, payload: &str) -> Result<(), StorageError>;

    /// Remove `slot`. Deleting a missing slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the delete.
    async fn delete_slot(&self, slot: &str) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ProgressSlotRepository for InMemoryRepository {
    async fn read_slot(&self, slot: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(slot).cloned())
    }

    async fn write_slot(&self, slot: &str, payload: &str) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(slot.to_owned(), payload.to_owned());
        Ok(())
    }

    async fn delete_slot(&self, slot: &str) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(slot);
        Ok(())
    }
}

/// Aggregates the slot repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub slots: Arc<dyn ProgressSlotRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let slots: Arc<dyn ProgressSlotRepository> = Arc::new(InMemoryRepository::new());
        Self { slots }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_slot_reads_as_none() {
        let repo = InMemoryRepository::new();
        assert!(repo.read_slot(PROGRESS_SLOT).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn write_overwrites_and_delete_removes() {
        let repo = InMemoryRepository::new();
        repo.write_slot(PROGRESS_SLOT, "{\"a\":1}").await.unwrap();
        repo.write_slot(PROGRESS_SLOT, "{\"a\":2}").await.unwrap();
        assert_eq!(
            repo.read_slot(PROGRESS_SLOT).await.unwrap().as_deref(),
            Some("{\"a\":2}")
        );

        repo.delete_slot(PROGRESS_SLOT).await.unwrap();
        assert!(repo.read_slot(PROGRESS_SLOT).await.unwrap().is_none());
        // deleting twice is fine
        repo.delete_slot(PROGRESS_SLOT).await.unwrap();
    }

    #[tokio::test]
    async fn clones_share_slots() {
        let repo = InMemoryRepository::new();
        let storage = Storage {
            slots: Arc::new(repo.clone()),
        };
        storage.slots.write_slot("other", "x").await.unwrap();
        assert_eq!(repo.read_slot("other").await.unwrap().as_deref(), Some("x"));
    }
}
