// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence traits: per-user task records and the consumer checkpoint.

use async_trait::async_trait;

use crate::error::AdvisorError;
use crate::types::{SaveOutcome, Task};

/// User-scoped task persistence.
///
/// Implementations guarantee that (`user_name`, `url`) is unique.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Returns true if a task with exactly this key is stored.
    async fn exists(&self, task: &Task) -> Result<bool, AdvisorError>;

    /// Inserts a task. Duplicate keys are reported as
    /// [`SaveOutcome::AlreadyExists`], never as an error.
    async fn save(&self, task: &Task) -> Result<SaveOutcome, AdvisorError>;

    /// Picks one of the user's tasks at random. `None` if the user has no tasks.
    async fn pick_random(&self, user_name: &str) -> Result<Option<Task>, AdvisorError>;

    /// Removes the task with exactly this key. Returns false if it was absent.
    async fn remove(&self, task: &Task) -> Result<bool, AdvisorError>;

    /// Lists the user's tasks in insertion order. Empty if the user has none.
    async fn list_all(&self, user_name: &str) -> Result<Vec<Task>, AdvisorError>;
}

/// Durable storage for consumer offsets, keyed by consumer name.
#[async_trait]
pub trait OffsetStore: Send + Sync {
    /// Returns the last checkpointed offset, if any.
    async fn load_offset(&self, consumer: &str) -> Result<Option<u64>, AdvisorError>;

    /// Records `offset` as the consumer's checkpoint.
    async fn save_offset(&self, consumer: &str, offset: u64) -> Result<(), AdvisorError>;
}
