use std::path::Path;
use std::sync::Arc;

use quiz_core::EnvironmentGuard;
use quiz_core::model::QuestionBank;
use storage::repository::Storage;
use storage::snapshot::SnapshotStore;

use crate::bank::load_bank;
use crate::error::AppServicesError;
use crate::quiz::QuizEngine;

/// Assembles app-facing services: the question bank and snapshot persistence.
#[derive(Clone)]
pub struct AppServices {
    bank: Arc<QuestionBank>,
    snapshots: SnapshotStore,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the bank cannot be loaded or storage
    /// initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        bank_path: Option<&Path>,
    ) -> Result<Self, AppServicesError> {
        let bank = load_bank(bank_path)?;
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_parts(Arc::new(bank), storage.snapshots()))
    }

    /// Build services over in-memory storage.
    #[must_use]
    pub fn in_memory(bank: QuestionBank) -> Self {
        Self::from_parts(Arc::new(bank), Storage::in_memory().snapshots())
    }

    #[must_use]
    pub fn from_parts(bank: Arc<QuestionBank>, snapshots: SnapshotStore) -> Self {
        Self { bank, snapshots }
    }

    #[must_use]
    pub fn bank(&self) -> Arc<QuestionBank> {
        Arc::clone(&self.bank)
    }

    #[must_use]
    pub fn snapshots(&self) -> SnapshotStore {
        self.snapshots.clone()
    }

    /// Start the quiz, resuming any stored session into `guard`.
    pub async fn start_quiz(&self, guard: &mut EnvironmentGuard) -> QuizEngine {
        QuizEngine::load(self.bank(), self.snapshots(), guard).await
    }

    /// Drop the stored snapshot without starting a session.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Storage` if the snapshot cannot be removed.
    pub async fn reset_saved_session(&self) -> Result<(), AppServicesError> {
        self.snapshots.clear().await?;
        Ok(())
    }
}
