// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory task and offset stores with failure injection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use advisor_core::{AdvisorError, OffsetStore, SaveOutcome, Task, TaskStore};

/// A `TaskStore` operation that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Exists,
    Save,
    PickRandom,
    Remove,
    ListAll,
}

impl StoreOp {
    fn bit(self) -> u8 {
        match self {
            StoreOp::Exists => 1,
            StoreOp::Save => 1 << 1,
            StoreOp::PickRandom => 1 << 2,
            StoreOp::Remove => 1 << 3,
            StoreOp::ListAll => 1 << 4,
        }
    }
}

fn injected(op: StoreOp) -> AdvisorError {
    AdvisorError::Storage {
        source: format!("injected {op:?} failure").into(),
    }
}

/// A `Vec`-backed task store that keeps insertion order.
///
/// `pick_random` is deterministic here: it returns the oldest task.
pub struct MemoryTaskStore {
    tasks: Mutex<Vec<Task>>,
    failing: AtomicU8,
    stale_exists: AtomicBool,
    lost_removes: AtomicBool,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            failing: AtomicU8::new(0),
            stale_exists: AtomicBool::new(false),
            lost_removes: AtomicBool::new(false),
        }
    }

    /// Make `op` fail until [`heal`](Self::heal) is called.
    pub fn fail(&self, op: StoreOp) {
        self.failing.fetch_or(op.bit(), Ordering::SeqCst);
    }

    /// Clear all injected failures.
    pub fn heal(&self) {
        self.failing.store(0, Ordering::SeqCst);
    }

    /// While set, `exists` always answers false, as if a concurrent writer
    /// inserted the row right after the check.
    pub fn set_stale_exists(&self, stale: bool) {
        self.stale_exists.store(stale, Ordering::SeqCst);
    }

    /// While set, `remove` deletes nothing and answers false, as if a
    /// concurrent writer removed the row first.
    pub fn set_lost_removes(&self, lost: bool) {
        self.lost_removes.store(lost, Ordering::SeqCst);
    }

    /// The user's tasks in insertion order.
    pub async fn tasks_for(&self, user_name: &str) -> Vec<Task> {
        self.tasks
            .lock()
            .await
            .iter()
            .filter(|t| t.user_name == user_name)
            .cloned()
            .collect()
    }

    fn check(&self, op: StoreOp) -> Result<(), AdvisorError> {
        if self.failing.load(Ordering::SeqCst) & op.bit() != 0 {
            Err(injected(op))
        } else {
            Ok(())
        }
    }
}

impl Default for MemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn exists(&self, task: &Task) -> Result<bool, AdvisorError> {
        self.check(StoreOp::Exists)?;
        if self.stale_exists.load(Ordering::SeqCst) {
            return Ok(false);
        }
        Ok(self.tasks.lock().await.contains(task))
    }

    async fn save(&self, task: &Task) -> Result<SaveOutcome, AdvisorError> {
        self.check(StoreOp::Save)?;
        let mut tasks = self.tasks.lock().await;
        if tasks.contains(task) {
            return Ok(SaveOutcome::AlreadyExists);
        }
        tasks.push(task.clone());
        Ok(SaveOutcome::Inserted)
    }

    async fn pick_random(&self, user_name: &str) -> Result<Option<Task>, AdvisorError> {
        self.check(StoreOp::PickRandom)?;
        Ok(self
            .tasks
            .lock()
            .await
            .iter()
            .find(|t| t.user_name == user_name)
            .cloned())
    }

    async fn remove(&self, task: &Task) -> Result<bool, AdvisorError> {
        self.check(StoreOp::Remove)?;
        if self.lost_removes.load(Ordering::SeqCst) {
            return Ok(false);
        }
        let mut tasks = self.tasks.lock().await;
        let before = tasks.len();
        tasks.retain(|t| t != task);
        Ok(tasks.len() < before)
    }

    async fn list_all(&self, user_name: &str) -> Result<Vec<Task>, AdvisorError> {
        self.check(StoreOp::ListAll)?;
        Ok(self.tasks_for(user_name).await)
    }
}

/// A map-backed offset store.
pub struct MemoryOffsetStore {
    offsets: Mutex<HashMap<String, u64>>,
    failing: AtomicBool,
}

impl MemoryOffsetStore {
    pub fn new() -> Self {
        Self {
            offsets: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// While set, `save_offset` fails and stores nothing.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn get(&self, consumer: &str) -> Option<u64> {
        self.offsets.lock().await.get(consumer).copied()
    }
}

impl Default for MemoryOffsetStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OffsetStore for MemoryOffsetStore {
    async fn load_offset(&self, consumer: &str) -> Result<Option<u64>, AdvisorError> {
        Ok(self.get(consumer).await)
    }

    async fn save_offset(&self, consumer: &str, offset: u64) -> Result<(), AdvisorError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AdvisorError::Storage {
                source: "injected checkpoint failure".into(),
            });
        }
        self.offsets.lock().await.insert(consumer.to_string(), offset);
        Ok(())
    }
}
