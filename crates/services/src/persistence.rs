use std::sync::Arc;

use learn_core::config::initial_snapshot;
use learn_core::model::{Module, ProgressSnapshot};
use storage::record::SnapshotRecord;
use storage::repository::{PROGRESS_SLOT, ProgressSlotRepository, StorageError};
use tracing::{debug, warn};

/// Reads and writes the progress snapshot in a single named slot.
///
/// Storage failures never reach the caller: reads fall back to defaults and
/// writes are dropped after logging.
#[derive(Clone)]
pub struct ProgressPersistence {
    slots: Arc<dyn ProgressSlotRepository>,
    slot: String,
}

impl ProgressPersistence {
    #[must_use]
    pub fn new(slots: Arc<dyn ProgressSlotRepository>) -> Self {
        Self {
            slots,
            slot: PROGRESS_SLOT.to_owned(),
        }
    }

    #[must_use]
    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = slot.into();
        self
    }

    #[must_use]
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Load the stored snapshot for `template`, or a fresh one when the slot is
    /// absent, unreadable, or belongs to different content.
    pub async fn load(&self, template: &Module) -> ProgressSnapshot {
        let payload = match self.slots.read_slot(&self.slot).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!(slot = %self.slot, "no stored progress, starting fresh");
                return initial_snapshot(template.clone());
            }
            Err(err) => {
                warn!(slot = %self.slot, error = %err, "failed to read progress, using defaults");
                return initial_snapshot(template.clone());
            }
        };

        let decoded = SnapshotRecord::from_json(&payload).and_then(SnapshotRecord::into_persisted);
        let persisted = match decoded {
            Ok(persisted) => persisted,
            Err(err) => {
                warn!(slot = %self.slot, error = %err, "stored progress is corrupt, using defaults");
                return initial_snapshot(template.clone());
            }
        };

        match ProgressSnapshot::rehydrate(template, persisted) {
            Ok(snapshot) => {
                debug!(
                    slot = %self.slot,
                    lesson = snapshot.current_lesson_index(),
                    coins = snapshot.user().coins(),
                    "restored progress"
                );
                snapshot
            }
            Err(err) => {
                warn!(slot = %self.slot, error = %err, "discarding stored progress");
                initial_snapshot(template.clone())
            }
        }
    }

    /// Overwrite the slot with `snapshot`. Failures are logged and dropped.
    pub async fn save(&self, snapshot: &ProgressSnapshot) {
        if let Err(err) = self.try_save(snapshot).await {
            warn!(slot = %self.slot, error = %err, "failed to save progress");
        }
    }

    /// Remove the slot. Failures are logged and dropped.
    pub async fn clear(&self) {
        if let Err(err) = self.slots.delete_slot(&self.slot).await {
            warn!(slot = %self.slot, error = %err, "failed to clear progress");
        }
    }

    async fn try_save(&self, snapshot: &ProgressSnapshot) -> Result<(), StorageError> {
        let payload = SnapshotRecord::from_snapshot(snapshot).to_json()?;
        self.slots.write_slot(&self.slot, &payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learn_core::config::default_module;
    use storage::repository::InMemoryRepository;

    fn persistence() -> (InMemoryRepository, ProgressPersistence) {
        let repo = InMemoryRepository::new();
        let persistence = ProgressPersistence::new(Arc::new(repo.clone()));
        (repo, persistence)
    }

    #[tokio::test]
    async fn empty_slot_loads_defaults() {
        let (_repo, persistence) = persistence();
        let module = default_module().unwrap();
        let snapshot = persistence.load(&module).await;
        assert_eq!(snapshot, initial_snapshot(module));
    }

    #[tokio::test]
    async fn saved_snapshot_loads_back() {
        let (_repo, persistence) = persistence();
        let module = default_module().unwrap();
        let mut snapshot = initial_snapshot(module.clone());
        snapshot.complete_element(0);
        snapshot.credit(5);
        snapshot.advance();

        persistence.save(&snapshot).await;
        assert_eq!(persistence.load(&module).await, snapshot);
    }

    #[tokio::test]
    async fn corrupt_payload_loads_defaults() {
        let (repo, persistence) = persistence();
        repo.write_slot(PROGRESS_SLOT, "{\"user\":").await.unwrap();
        let module = default_module().unwrap();
        assert_eq!(persistence.load(&module).await, initial_snapshot(module));
    }

    #[tokio::test]
    async fn clear_removes_slot() {
        let (repo, persistence) = persistence();
        let module = default_module().unwrap();
        persistence.save(&initial_snapshot(module)).await;
        assert!(repo.read_slot(PROGRESS_SLOT).await.unwrap().is_some());

        persistence.clear().await;
        assert!(repo.read_slot(PROGRESS_SLOT).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn custom_slot_is_used() {
        let (repo, persistence) = persistence();
        let persistence = persistence.with_slot("other");
        persistence
            .save(&initial_snapshot(default_module().unwrap()))
            .await;
        assert!(repo.read_slot("other").await.unwrap().is_some());
        assert!(repo.read_slot(PROGRESS_SLOT).await.unwrap().is_none());
    }
}
