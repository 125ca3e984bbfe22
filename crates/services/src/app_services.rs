use std::path::Path;
use std::sync::Arc;

use tracing::info;

use learn_core::RewardPolicy;
use learn_core::config::{default_module, parse_module};
use learn_core::model::Module;
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::lesson_flow::LessonFlow;
use crate::persistence::ProgressPersistence;
use crate::progress_store::ProgressStore;

/// Assembles the progress store over a storage backend.
pub struct AppServices {
    store: ProgressStore,
    policy: RewardPolicy,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        module: Module,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, module).await)
    }

    /// Build services over process-local storage. Nothing survives a restart.
    pub async fn new_in_memory(clock: Clock, module: Module) -> Self {
        Self::from_storage(&Storage::in_memory(), clock, module).await
    }

    pub async fn from_storage(storage: &Storage, clock: Clock, module: Module) -> Self {
        let persistence = ProgressPersistence::new(Arc::clone(&storage.slots));
        let store = ProgressStore::load(clock, module, persistence).await;
        info!(
            module = %store.current_module().id(),
            lesson = store.current_lesson_index(),
            coins = store.user().coins(),
            "progress loaded"
        );
        Self {
            store,
            policy: RewardPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RewardPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn policy(&self) -> RewardPolicy {
        self.policy
    }

    #[must_use]
    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ProgressStore {
        &mut self.store
    }

    /// Page state for the lesson the store is positioned on.
    #[must_use]
    pub fn lesson_flow(&self) -> LessonFlow {
        LessonFlow::new(&self.store, self.policy)
    }
}

/// Load the module at `path`, or the bundled module when no path is given.
///
/// # Errors
///
/// Returns `AppServicesError::Io` if the file cannot be read and
/// `AppServicesError::Config` if it is not a valid module.
pub fn load_module(path: Option<&Path>) -> Result<Module, AppServicesError> {
    let Some(path) = path else {
        return Ok(default_module()?);
    };
    let json = std::fs::read_to_string(path).map_err(|source| AppServicesError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_module(&json)?)
}
