// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the full consumer pipeline with a mock event
//! source, a recording reply sink and a temp SQLite database. Tests push
//! messages, run the consumer until the stream is drained, and inspect the
//! replies and the stored tasks.

use std::sync::Arc;
use std::time::Duration;

use advisor_config::model::{ConsumerConfig, RepliesConfig, StorageConfig};
use advisor_consumer::{ConsumerSettings, Dispatcher, EventConsumer, Replies};
use advisor_core::AdvisorError;
use advisor_storage::SqliteStorage;
use tokio_util::sync::CancellationToken;

use crate::mock_channel::{MockEventSource, RecordingSink};

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    consumer: ConsumerConfig,
    replies: RepliesConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            consumer: ConsumerConfig {
                name: "test".to_string(),
                idle_interval_ms: 10,
                backoff_interval_ms: 10,
                ..ConsumerConfig::default()
            },
            replies: RepliesConfig::default(),
        }
    }

    /// Maximum events per fetch.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.consumer.batch_size = batch_size;
        self
    }

    /// Override the reply catalog.
    pub fn with_replies(mut self, replies: RepliesConfig) -> Self {
        self.replies = replies;
        self
    }

    /// Build the test harness, opening a fresh temp database.
    pub async fn build(self) -> Result<TestHarness, AdvisorError> {
        let temp_dir = tempfile::TempDir::new().map_err(AdvisorError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        });
        storage.initialize().await?;

        Ok(TestHarness {
            source: Arc::new(MockEventSource::new()),
            sink: Arc::new(RecordingSink::new()),
            storage: Arc::new(storage),
            consumer: self.consumer,
            replies: self.replies,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with mock adapters and temp storage.
pub struct TestHarness {
    /// The scripted event stream.
    pub source: Arc<MockEventSource>,
    /// Captures every reply.
    pub sink: Arc<RecordingSink>,
    /// SQLite storage (temp DB, cleaned up on drop).
    pub storage: Arc<SqliteStorage>,
    consumer: ConsumerConfig,
    replies: RepliesConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A harness with default settings.
    pub async fn new() -> Result<Self, AdvisorError> {
        Self::builder().build().await
    }

    /// Queue a message from `username` in chat `chat_id`.
    pub async fn send(&self, chat_id: i64, username: &str, text: &str) -> u64 {
        self.source.push_message(chat_id, username, text).await
    }

    /// A consumer wired to this harness, positioned at its stored checkpoint.
    pub async fn consumer(&self) -> Result<EventConsumer, AdvisorError> {
        let dispatcher = Dispatcher::new(
            self.storage.clone(),
            self.sink.clone(),
            Replies::new(self.replies.clone(), self.consumer.command_prefix),
            self.consumer.command_prefix,
        );
        let mut consumer = EventConsumer::new(
            self.source.clone(),
            dispatcher,
            self.storage.clone(),
            ConsumerSettings::from(&self.consumer),
        );
        consumer.resume().await?;
        Ok(consumer)
    }

    /// Run a fresh consumer until every queued event is handled.
    ///
    /// Returns the final offset. Fails if the stream is not drained within
    /// ten seconds.
    pub async fn run_until_drained(&self) -> Result<u64, AdvisorError> {
        let mut consumer = self.consumer().await?;
        let cancel = CancellationToken::new();
        self.source.cancel_when_drained(cancel.clone()).await;

        tokio::time::timeout(Duration::from_secs(10), consumer.run(cancel))
            .await
            .map_err(|_| AdvisorError::Timeout {
                duration: Duration::from_secs(10),
            })??;
        Ok(consumer.offset())
    }
}
