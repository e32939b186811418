// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Executes one event's command against the task store and replies.

use std::sync::Arc;

use advisor_core::{AdvisorError, Event, EventKind, ReplySink, SaveOutcome, Task, TaskStore};
use tracing::{debug, warn};

use crate::command::Command;
use crate::replies::Replies;

/// Why a `/delete` argument was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionError {
    Missing,
    /// Not a number, or below 1.
    Invalid,
}

/// Parses the 1-based list position given to `/delete`.
pub fn parse_position(arg: Option<&str>) -> Result<usize, PositionError> {
    let arg = arg.ok_or(PositionError::Missing)?;
    let n: i64 = arg.parse().map_err(|_| PositionError::Invalid)?;
    if n < 1 {
        return Err(PositionError::Invalid);
    }
    usize::try_from(n).map_err(|_| PositionError::Invalid)
}

/// Classifies events into commands and carries them out.
///
/// Every handled command sends exactly one reply to the event's chat.
/// Store and reply failures are returned to the caller, except in `/delete`,
/// which answers the user instead.
pub struct Dispatcher {
    store: Arc<dyn TaskStore>,
    sink: Arc<dyn ReplySink>,
    replies: Replies,
    prefix: char,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn TaskStore>,
        sink: Arc<dyn ReplySink>,
        replies: Replies,
        prefix: char,
    ) -> Self {
        Self {
            store,
            sink,
            replies,
            prefix,
        }
    }

    /// Handles one event.
    pub async fn dispatch(&self, event: &Event) -> Result<(), AdvisorError> {
        if event.kind == EventKind::Unsupported {
            return Err(AdvisorError::UnsupportedEvent { id: event.id });
        }

        let command = Command::parse(&event.text, self.prefix);
        debug!(
            event_id = event.id,
            user = %event.username,
            command = command.name(),
            "dispatching"
        );

        match command {
            Command::Add(text) => self.save_task(event, text).await,
            Command::Random => self.send_random(event).await,
            Command::Help => self.reply(event, self.replies.help()).await,
            Command::Start => self.reply(event, &self.replies.start()).await,
            Command::ListAll => self.list_tasks(event).await,
            Command::Delete(arg) => self.delete_task(event, arg.as_deref()).await,
            Command::Unknown => self.reply(event, self.replies.unknown_command()).await,
        }
    }

    async fn reply(&self, event: &Event, text: &str) -> Result<(), AdvisorError> {
        self.sink.reply(event.chat_id, text).await
    }

    async fn save_task(&self, event: &Event, text: String) -> Result<(), AdvisorError> {
        let task = Task::new(&event.username, text);

        if self.store.exists(&task).await? {
            return self.reply(event, self.replies.already_exists()).await;
        }

        match self.store.save(&task).await? {
            SaveOutcome::Inserted => {
                debug!(user = %event.username, "task saved");
                self.reply(event, self.replies.saved()).await
            }
            SaveOutcome::AlreadyExists => self.reply(event, self.replies.already_exists()).await,
        }
    }

    async fn send_random(&self, event: &Event) -> Result<(), AdvisorError> {
        let Some(task) = self.store.pick_random(&event.username).await? else {
            return self.reply(event, self.replies.no_saved_tasks()).await;
        };

        self.reply(event, &task.url).await?;
        self.store.remove(&task).await?;
        Ok(())
    }

    async fn list_tasks(&self, event: &Event) -> Result<(), AdvisorError> {
        let tasks = self.store.list_all(&event.username).await?;
        if tasks.is_empty() {
            return self.reply(event, self.replies.no_saved_tasks()).await;
        }
        self.reply(event, &self.replies.listing(&tasks)).await
    }

    async fn delete_task(&self, event: &Event, arg: Option<&str>) -> Result<(), AdvisorError> {
        let position = match parse_position(arg) {
            Ok(position) => position,
            Err(PositionError::Missing) => {
                return self.reply(event, self.replies.delete_usage()).await;
            }
            Err(PositionError::Invalid) => {
                return self.reply(event, self.replies.invalid_number()).await;
            }
        };

        let tasks = match self.store.list_all(&event.username).await {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(user = %event.username, error = %e, "failed to list tasks for delete");
                Vec::new()
            }
        };
        if tasks.is_empty() {
            return self.reply(event, self.replies.no_tasks()).await;
        }

        let Some(task) = tasks.get(position - 1) else {
            return self.reply(event, self.replies.no_such_task()).await;
        };

        match self.store.remove(task).await {
            Ok(true) => self.reply(event, &self.replies.deleted(&task.url)).await,
            // Removed by someone else between list and delete.
            Ok(false) => self.reply(event, self.replies.delete_failed()).await,
            Err(e) => {
                warn!(user = %event.username, error = %e, "failed to delete task");
                self.reply(event, self.replies.delete_failed()).await
            }
        }
    }
}
