// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the `TaskStore` and `OffsetStore` traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use advisor_config::model::StorageConfig;
use advisor_core::{
    AdapterType, AdvisorError, HealthStatus, OffsetStore, PluginAdapter, SaveOutcome, Task,
    TaskStore,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is opened by [`SqliteStorage::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`](Self::initialize) is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Open the database and run migrations. Fails if called twice.
    pub async fn initialize(&self) -> Result<(), AdvisorError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| AdvisorError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    /// Checkpoint the WAL so the database file is self-contained.
    pub async fn close(&self) -> Result<(), AdvisorError> {
        self.db()?.checkpoint().await
    }

    fn db(&self) -> Result<&Database, AdvisorError> {
        self.db.get().ok_or_else(|| AdvisorError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, AdvisorError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get::<_, i64>(0))?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AdvisorError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: storage flushed");
        }
        Ok(())
    }
}

#[async_trait]
impl TaskStore for SqliteStorage {
    async fn exists(&self, task: &Task) -> Result<bool, AdvisorError> {
        queries::tasks::exists(self.db()?, task).await
    }

    async fn save(&self, task: &Task) -> Result<SaveOutcome, AdvisorError> {
        queries::tasks::insert(self.db()?, task).await
    }

    async fn pick_random(&self, user_name: &str) -> Result<Option<Task>, AdvisorError> {
        queries::tasks::pick_random(self.db()?, user_name).await
    }

    async fn remove(&self, task: &Task) -> Result<bool, AdvisorError> {
        queries::tasks::remove(self.db()?, task).await
    }

    async fn list_all(&self, user_name: &str) -> Result<Vec<Task>, AdvisorError> {
        queries::tasks::list_by_user(self.db()?, user_name).await
    }
}

#[async_trait]
impl OffsetStore for SqliteStorage {
    async fn load_offset(&self, consumer: &str) -> Result<Option<u64>, AdvisorError> {
        queries::offsets::load(self.db()?, consumer).await
    }

    async fn save_offset(&self, consumer: &str, offset: u64) -> Result<(), AdvisorError> {
        queries::offsets::save(self.db()?, consumer, offset).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{TempDir, tempdir};

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    async fn open_storage() -> (TempDir, SqliteStorage) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("advisor.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn sqlite_storage_implements_plugin_adapter() {
        let storage = SqliteStorage::new(make_config("unused.db"));
        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.version(), semver::Version::new(0, 1, 0));
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let (_dir, storage) = open_storage().await;
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn operations_before_initialize_fail() {
        let storage = SqliteStorage::new(make_config("never-opened.db"));
        let err = storage.list_all("alice").await.unwrap_err();
        assert!(err.to_string().contains("not initialized"));
        // Shutdown of an unopened store is a no-op.
        storage.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn health_check_is_healthy_after_initialize() {
        let (_dir, storage) = open_storage().await;
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn duplicate_save_reports_already_exists() {
        let (_dir, storage) = open_storage().await;
        let task = Task::new("alice", "buy milk");

        assert_eq!(storage.save(&task).await.unwrap(), SaveOutcome::Inserted);
        assert_eq!(storage.save(&task).await.unwrap(), SaveOutcome::AlreadyExists);
        assert!(storage.exists(&task).await.unwrap());
        assert_eq!(storage.list_all("alice").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn same_text_for_different_users_is_two_tasks() {
        let (_dir, storage) = open_storage().await;
        storage.save(&Task::new("alice", "read")).await.unwrap();
        storage.save(&Task::new("bob", "read")).await.unwrap();

        assert_eq!(storage.list_all("alice").await.unwrap(), vec![Task::new("alice", "read")]);
        assert_eq!(storage.list_all("bob").await.unwrap(), vec![Task::new("bob", "read")]);
    }

    #[tokio::test]
    async fn list_all_keeps_insertion_order() {
        let (_dir, storage) = open_storage().await;
        for text in ["buy milk", "clean room", "answer mail"] {
            storage.save(&Task::new("alice", text)).await.unwrap();
        }

        let texts: Vec<String> = storage
            .list_all("alice")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.url)
            .collect();
        assert_eq!(texts, ["buy milk", "clean room", "answer mail"]);
    }

    #[tokio::test]
    async fn pick_random_is_scoped_to_user() {
        let (_dir, storage) = open_storage().await;
        assert_eq!(storage.pick_random("alice").await.unwrap(), None);

        storage.save(&Task::new("bob", "walk dog")).await.unwrap();
        assert_eq!(storage.pick_random("alice").await.unwrap(), None);

        storage.save(&Task::new("alice", "buy milk")).await.unwrap();
        assert_eq!(
            storage.pick_random("alice").await.unwrap(),
            Some(Task::new("alice", "buy milk"))
        );
    }

    #[tokio::test]
    async fn remove_reports_whether_a_row_was_deleted() {
        let (_dir, storage) = open_storage().await;
        let task = Task::new("alice", "buy milk");
        storage.save(&task).await.unwrap();

        assert!(storage.remove(&task).await.unwrap());
        assert!(!storage.remove(&task).await.unwrap());
        assert!(!storage.exists(&task).await.unwrap());
    }

    #[tokio::test]
    async fn offset_round_trips_and_overwrites() {
        let (_dir, storage) = open_storage().await;
        assert_eq!(storage.load_offset("telegram").await.unwrap(), None);

        storage.save_offset("telegram", 5).await.unwrap();
        storage.save_offset("telegram", 12).await.unwrap();
        storage.save_offset("other", 1).await.unwrap();

        assert_eq!(storage.load_offset("telegram").await.unwrap(), Some(12));
        assert_eq!(storage.load_offset("other").await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn offset_beyond_i64_is_rejected() {
        let (_dir, storage) = open_storage().await;
        assert!(storage.save_offset("telegram", u64::MAX).await.is_err());
        assert_eq!(storage.load_offset("telegram").await.unwrap(), None);
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("persist.db");
        let path = db_path.to_str().unwrap();

        {
            let storage = SqliteStorage::new(make_config(path));
            storage.initialize().await.unwrap();
            storage.save(&Task::new("alice", "buy milk")).await.unwrap();
            storage.save_offset("telegram", 7).await.unwrap();
            storage.close().await.unwrap();
        }

        let storage = SqliteStorage::new(make_config(path));
        storage.initialize().await.unwrap();
        assert!(storage.exists(&Task::new("alice", "buy milk")).await.unwrap());
        assert_eq!(storage.load_offset("telegram").await.unwrap(), Some(7));
    }
}
