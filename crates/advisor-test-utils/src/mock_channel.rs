// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock event source and reply sink for deterministic testing.
//!
//! `MockEventSource` serves a scripted event list by offset and records every
//! fetch. `RecordingSink` captures outbound replies for assertion in tests.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use advisor_core::traits::{EventSource, PluginAdapter, ReplySink};
use advisor_core::types::{AdapterType, Event, HealthStatus};
use advisor_core::AdvisorError;

/// A mock event stream.
///
/// Events pushed with [`push_message`](Self::push_message) form an ordered
/// log. `fetch(offset, limit)` returns `log[offset..offset + limit]`, so
/// fetching the same offset twice returns the same batch.
pub struct MockEventSource {
    events: Mutex<Vec<Event>>,
    fetches: Mutex<Vec<u64>>,
    pending_failures: Mutex<usize>,
    drained: Mutex<Option<CancellationToken>>,
    next_id: AtomicU64,
}

impl MockEventSource {
    /// Create an empty source. Event ids start at 1.
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fetches: Mutex::new(Vec::new()),
            pending_failures: Mutex::new(0),
            drained: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Append a text message from `username` in `chat_id`. Returns its id.
    pub async fn push_message(&self, chat_id: i64, username: &str, text: &str) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.events
            .lock()
            .await
            .push(Event::message(id, text, chat_id, username));
        id
    }

    /// Append an update the dispatcher cannot handle.
    pub async fn push_unsupported(&self) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.events.lock().await.push(Event::unsupported(id));
        id
    }

    /// The full event log.
    pub async fn events(&self) -> Vec<Event> {
        self.events.lock().await.clone()
    }

    /// Offsets passed to `fetch()`, in call order.
    pub async fn fetch_offsets(&self) -> Vec<u64> {
        self.fetches.lock().await.clone()
    }

    /// Make the next `n` fetches fail with a channel error.
    pub async fn fail_next_fetches(&self, n: usize) {
        *self.pending_failures.lock().await = n;
    }

    /// Cancel `token` the first time a fetch finds nothing left to deliver.
    pub async fn cancel_when_drained(&self, token: CancellationToken) {
        *self.drained.lock().await = Some(token);
    }
}

impl Default for MockEventSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockEventSource {
    fn name(&self) -> &str {
        "mock-source"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::EventSource
    }

    async fn health_check(&self) -> Result<HealthStatus, AdvisorError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AdvisorError> {
        Ok(())
    }
}

#[async_trait]
impl EventSource for MockEventSource {
    async fn fetch(&self, offset: u64, limit: usize) -> Result<Vec<Event>, AdvisorError> {
        self.fetches.lock().await.push(offset);

        {
            let mut failures = self.pending_failures.lock().await;
            if *failures > 0 {
                *failures -= 1;
                return Err(AdvisorError::Channel {
                    message: "injected fetch failure".into(),
                    source: None,
                });
            }
        }

        let events = self.events.lock().await;
        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(events.len());
        let end = start.saturating_add(limit).min(events.len());

        if start == events.len()
            && let Some(token) = self.drained.lock().await.as_ref()
        {
            token.cancel();
        }

        Ok(events[start..end].to_vec())
    }
}

/// A reply sink that records every reply.
pub struct RecordingSink {
    replies: Mutex<Vec<(i64, String)>>,
    failing: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// All replies as `(chat_id, text)`, in send order.
    pub async fn replies(&self) -> Vec<(i64, String)> {
        self.replies.lock().await.clone()
    }

    /// Reply texts only, in send order.
    pub async fn texts(&self) -> Vec<String> {
        self.replies
            .lock()
            .await
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// Replies sent to one chat.
    pub async fn texts_for(&self, chat_id: i64) -> Vec<String> {
        self.replies
            .lock()
            .await
            .iter()
            .filter(|(chat, _)| *chat == chat_id)
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// While set, every reply fails and nothing is recorded.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn clear(&self) {
        self.replies.lock().await.clear();
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReplySink for RecordingSink {
    async fn reply(&self, chat_id: i64, text: &str) -> Result<(), AdvisorError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AdvisorError::Channel {
                message: "injected reply failure".into(),
                source: None,
            });
        }
        self.replies.lock().await.push((chat_id, text.to_string()));
        Ok(())
    }
}
