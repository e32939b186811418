// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the consumer, the dispatcher, and the adapters.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the role an adapter plays in the service.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    EventSource,
    Storage,
}

/// What kind of update an [`Event`] was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A chat message; `text`, `chat_id`, and `username` are meaningful.
    Message,
    /// Any other update (edits, callbacks, member changes). Still counts toward the offset.
    Unsupported,
}

/// One inbound update from the messaging backend.
///
/// Events are immutable and live only until dispatch completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Strictly increasing, unique identifier within the stream.
    pub id: u64,
    pub kind: EventKind,
    /// Message text. Empty for non-text messages and unsupported updates.
    pub text: String,
    /// Destination for replies.
    pub chat_id: i64,
    /// Originating user; the task-ownership key.
    pub username: String,
}

impl Event {
    /// Creates a chat message event.
    pub fn message(
        id: u64,
        text: impl Into<String>,
        chat_id: i64,
        username: impl Into<String>,
    ) -> Self {
        Self {
            id,
            kind: EventKind::Message,
            text: text.into(),
            chat_id,
            username: username.into(),
        }
    }

    /// Creates an event for an update the dispatcher does not handle.
    pub fn unsupported(id: u64) -> Self {
        Self {
            id,
            kind: EventKind::Unsupported,
            text: String::new(),
            chat_id: 0,
            username: String::new(),
        }
    }
}

/// A stored free-text task owned by a user.
///
/// The pair (`user_name`, `url`) is unique in the store. The `url` name is
/// historical: the column holds arbitrary task text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task {
    pub url: String,
    pub user_name: String,
}

impl Task {
    pub fn new(user_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user_name: user_name.into(),
        }
    }
}

/// Result of inserting a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new record was written.
    Inserted,
    /// A record with the same (user, text) key already existed; nothing was written.
    AlreadyExists,
}
