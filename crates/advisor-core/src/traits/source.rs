// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event source and reply sink traits for messaging backends (Telegram).

use async_trait::async_trait;

use crate::error::AdvisorError;
use crate::traits::adapter::PluginAdapter;
use crate::types::Event;

/// Pull-based access to an unbounded, ordered event stream.
#[async_trait]
pub trait EventSource: PluginAdapter {
    /// Fetches up to `limit` events starting at `offset`.
    ///
    /// Events are returned in strictly increasing id order. An empty vector
    /// means nothing new is available yet. Fetching the same offset again
    /// after an error yields the same events.
    async fn fetch(&self, offset: u64, limit: usize) -> Result<Vec<Event>, AdvisorError>;
}

/// Delivers text replies to a chat.
#[async_trait]
pub trait ReplySink: Send + Sync {
    /// Sends `text` to `chat_id`.
    async fn reply(&self, chat_id: i64, text: &str) -> Result<(), AdvisorError>;
}
