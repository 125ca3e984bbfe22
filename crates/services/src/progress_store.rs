use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use learn_core::config::initial_snapshot;
use learn_core::model::{Lesson, Module, ProgressSnapshot, User};
use learn_core::time::Transient;

use crate::Clock;
use crate::persistence::ProgressPersistence;

/// Seconds a coin award stays visible after it is raised.
pub const COIN_AWARD_TTL_SECS: i64 = 2;

/// Owns the learner's progress and persists it after every change.
///
/// Each command applies its change in memory first and then overwrites the
/// storage slot. Storage failures are logged by [`ProgressPersistence`] and never
/// roll the change back.
pub struct ProgressStore {
    clock: Clock,
    template: Module,
    snapshot: ProgressSnapshot,
    persistence: ProgressPersistence,
    coin_award: Option<Transient<u64>>,
}

impl ProgressStore {
    /// Restore progress for `module` from `persistence`, falling back to defaults.
    pub async fn load(clock: Clock, module: Module, persistence: ProgressPersistence) -> Self {
        let snapshot = persistence.load(&module).await;
        Self {
            clock,
            template: module,
            snapshot,
            persistence,
            coin_award: None,
        }
    }

    //
    // ─── READS ─────────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn user(&self) -> &User {
        self.snapshot.user()
    }

    #[must_use]
    pub fn current_module(&self) -> &Module {
        self.snapshot.module()
    }

    #[must_use]
    pub fn current_lesson_index(&self) -> usize {
        self.snapshot.current_lesson_index()
    }

    #[must_use]
    pub fn current_lesson(&self) -> &Lesson {
        self.snapshot.current_lesson()
    }

    #[must_use]
    pub fn snapshot(&self) -> &ProgressSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// The most recent award while it is still visible.
    #[must_use]
    pub fn coin_award(&self) -> Option<u64> {
        self.coin_award_at(self.clock.now())
    }

    #[must_use]
    pub fn coin_award_at(&self, now: DateTime<Utc>) -> Option<u64> {
        self.coin_award
            .as_ref()
            .and_then(|award| award.get(now))
            .copied()
    }

    //
    // ─── COMMANDS ──────────────────────────────────────────────────────────────
    //

    /// Move to the next lesson. Returns false on the last lesson.
    pub async fn advance_lesson(&mut self) -> bool {
        let moved = self.snapshot.advance();
        debug!(moved, index = self.current_lesson_index(), "advance lesson");
        self.persist().await;
        moved
    }

    /// Move to the previous lesson. Returns false on the first lesson.
    pub async fn retreat_lesson(&mut self) -> bool {
        let moved = self.snapshot.retreat();
        debug!(moved, index = self.current_lesson_index(), "retreat lesson");
        self.persist().await;
        moved
    }

    /// Mark the interactive element of lesson `index` completed. Awards nothing.
    ///
    /// Returns true when the element was not completed before.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a valid lesson index.
    pub async fn complete_interactive_element(&mut self, index: usize) -> bool {
        let changed = self.snapshot.complete_element(index);
        debug!(index, changed, "complete interactive element");
        self.persist().await;
        changed
    }

    /// Mark lesson `index` completed. Awards nothing.
    ///
    /// Returns true when the lesson was not completed before.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a valid lesson index.
    pub async fn complete_lesson(&mut self, index: usize) -> bool {
        let changed = self.snapshot.complete_lesson(index);
        debug!(
            index,
            changed,
            progress = self.current_module().progress(),
            "complete lesson"
        );
        self.persist().await;
        changed
    }

    /// Credit `amount` coins and raise the award signal. Zero is ignored.
    pub async fn award_coins(&mut self, amount: u64) {
        if amount == 0 {
            return;
        }
        self.snapshot.credit(amount);
        let ttl = Duration::seconds(COIN_AWARD_TTL_SECS);
        self.coin_award = Some(Transient::raise(amount, self.clock.now(), ttl));
        debug!(amount, balance = self.user().coins(), "award coins");
        self.persist().await;
    }

    /// Restore the default learner, module flags and position, and erase the slot.
    pub async fn reset_module(&mut self) {
        self.snapshot = initial_snapshot(self.template.clone());
        self.coin_award = None;
        debug!("reset module");
        self.persistence.clear().await;
    }

    async fn persist(&self) {
        self.persistence.save(&self.snapshot).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use learn_core::config::default_module;
    use learn_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    async fn store() -> ProgressStore {
        let persistence = ProgressPersistence::new(Arc::new(InMemoryRepository::new()));
        ProgressStore::load(
            Clock::fixed(fixed_now()),
            default_module().unwrap(),
            persistence,
        )
        .await
    }

    #[tokio::test]
    async fn starts_from_defaults() {
        let store = store().await;
        assert_eq!(store.user().name(), "John Doe");
        assert_eq!(store.user().coins(), 25);
        assert_eq!(store.current_lesson_index(), 0);
        assert_eq!(store.current_module().completed_count(), 0);
        assert_eq!(store.coin_award(), None);
    }

    #[tokio::test]
    async fn coin_award_expires_after_ttl() {
        let mut store = store().await;
        store.award_coins(5).await;
        assert_eq!(store.user().coins(), 30);
        assert_eq!(store.coin_award(), Some(5));

        let later = fixed_now() + Duration::seconds(COIN_AWARD_TTL_SECS);
        assert_eq!(store.coin_award_at(later - Duration::milliseconds(1)), Some(5));
        assert_eq!(store.coin_award_at(later), None);
    }

    #[tokio::test]
    async fn latest_award_replaces_earlier_one() {
        let mut store = store().await;
        store.award_coins(5).await;
        store.award_coins(10).await;
        assert_eq!(store.coin_award(), Some(10));
        assert_eq!(store.user().coins(), 40);
    }

    #[tokio::test]
    async fn zero_award_is_ignored() {
        let mut store = store().await;
        store.award_coins(0).await;
        assert_eq!(store.coin_award(), None);
        assert_eq!(store.user().coins(), 25);
    }

    #[tokio::test]
    #[should_panic(expected = "out of range")]
    async fn out_of_range_lesson_panics() {
        let mut store = store().await;
        store.complete_lesson(3).await;
    }
}
