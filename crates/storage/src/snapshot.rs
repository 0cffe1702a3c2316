use std::sync::Arc;

use quiz_core::model::SessionSnapshot;

use crate::repository::{KeyValueRepository, StorageError};

/// Storage key the session snapshot lives under.
pub const SNAPSHOT_KEY: &str = "quizData";

/// Persistence adapter for the session snapshot.
///
/// Owns the storage key; callers only see `load`, `save` and `clear`.
#[derive(Clone)]
pub struct SnapshotStore {
    kv: Arc<dyn KeyValueRepository>,
}

impl SnapshotStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueRepository>) -> Self {
        Self { kv }
    }

    /// Read the stored snapshot, if any.
    ///
    /// Decoding is structural only; range checks against a bank are the caller's job.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored value is not a snapshot, or
    /// other storage errors from the backend.
    pub async fn load(&self) -> Result<Option<SessionSnapshot>, StorageError> {
        let Some(raw) = self.kv.get(SNAPSHOT_KEY).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be encoded or stored.
    pub async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        let raw = serde_json::to_string(snapshot)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.kv.put(SNAPSHOT_KEY, &raw).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.kv.delete(SNAPSHOT_KEY).await
    }
}

impl crate::repository::Storage {
    /// Snapshot adapter over this storage's key-value repository.
    #[must_use]
    pub fn snapshots(&self) -> SnapshotStore {
        SnapshotStore::new(Arc::clone(&self.kv))
    }
}
