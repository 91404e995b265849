//! Snapshot persistence boundary.
//!
//! The store never touches a disk; it only guarantees its state is a plain
//! [`StoreSnapshot`] at any time. Storage backends implement
//! [`SnapshotStorage`].

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::config::StoreConfig;
use crate::model::StoreSnapshot;
use crate::store::{Environment, QuestionStore};
use crate::tree::ListenerId;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage backend failed: {0}")]
    Backend(String),

    #[error("Stored snapshot is malformed: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Load/save of a whole store snapshot.
pub trait SnapshotStorage: Send + Sync {
    /// Previously saved snapshot, or `None` if nothing was saved.
    fn load(&self) -> Result<Option<StoreSnapshot>, StorageError>;

    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), StorageError>;
}

/// Keeps the serialized snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON as last saved.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().clone()
    }

    /// Overwrite the raw contents, e.g. to simulate corruption.
    pub fn set_raw(&self, raw: impl Into<String>) {
        *self.slot.lock() = Some(raw.into());
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load(&self) -> Result<Option<StoreSnapshot>, StorageError> {
        match self.slot.lock().as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), StorageError> {
        let raw = serde_json::to_string(snapshot)?;
        *self.slot.lock() = Some(raw);
        Ok(())
    }
}

/// Build a store from the saved snapshot.
///
/// Falls back to an empty store when nothing is saved, the saved data
/// cannot be read, or it does not satisfy the schema.
pub fn hydrate(storage: &dyn SnapshotStorage, env: Environment, config: StoreConfig) -> QuestionStore {
    let snapshot = match storage.load() {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => return QuestionStore::new(env, config),
        Err(err) => {
            tracing::warn!(error = %err, "Failed to load saved state, starting empty");
            return QuestionStore::new(env, config);
        }
    };

    match QuestionStore::from_snapshot(snapshot, env.clone(), config.clone()) {
        Ok(store) => {
            tracing::info!(questions = store.len(), "Restored saved state");
            store
        }
        Err(err) => {
            tracing::warn!(error = %err, "Saved state is invalid, starting empty");
            QuestionStore::new(env, config)
        }
    }
}

/// Save the store's snapshot after every committed action.
///
/// Save failures are logged; they never undo the action.
pub fn attach_autosave(store: &QuestionStore, storage: Arc<dyn SnapshotStorage>) -> ListenerId {
    let target = store.downgrade();
    store.subscribe(move |event| {
        let Some(store) = target.upgrade() else {
            return;
        };
        if let Err(err) = storage.save(&store.snapshot()) {
            tracing::warn!(action = event.name, error = %err, "Failed to save state");
        }
    })
}
