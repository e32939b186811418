// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram adapter for the Advisor task bot.
//!
//! Implements [`EventSource`] on top of `getUpdates` long polling and
//! [`ReplySink`] on top of `sendMessage`, via teloxide.

pub mod chunk;
pub mod cursor;
pub mod handler;

use async_trait::async_trait;
use advisor_config::model::TelegramConfig;
use advisor_core::error::AdvisorError;
use advisor_core::traits::{EventSource, PluginAdapter, ReplySink};
use advisor_core::types::{AdapterType, Event, HealthStatus};
use teloxide::payloads::GetUpdatesSetters;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cursor::UpdateCursor;

/// Telegram accepts at most 100 updates per `getUpdates` call.
const MAX_UPDATES_PER_CALL: usize = 100;

/// Telegram event source and reply sink.
///
/// The consumer's offset counts events; the adapter translates it into
/// Telegram update ids through an [`UpdateCursor`].
pub struct TelegramChannel {
    bot: Bot,
    config: TelegramConfig,
    cursor: Mutex<UpdateCursor>,
}

impl TelegramChannel {
    /// Creates a new Telegram adapter.
    ///
    /// Requires `config.bot_token` to be set. Honors `config.api_url`.
    pub fn new(config: TelegramConfig) -> Result<Self, AdvisorError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            AdvisorError::Config("telegram.bot_token is required for the Telegram adapter".into())
        })?;

        if token.trim().is_empty() {
            return Err(AdvisorError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let mut bot = Bot::new(token);
        if let Some(api_url) = config.api_url.as_deref() {
            let url = api_url.parse::<reqwest::Url>().map_err(|e| {
                AdvisorError::Config(format!("telegram.api_url `{api_url}` is not a valid URL: {e}"))
            })?;
            bot = bot.set_api_url(url);
        }

        Ok(Self {
            bot,
            config,
            cursor: Mutex::new(UpdateCursor::new()),
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::EventSource
    }

    async fn health_check(&self) -> Result<HealthStatus, AdvisorError> {
        // getMe doubles as a token check.
        match self.bot.get_me().await {
            Ok(me) => {
                debug!(bot = %me.username(), "Telegram bot reachable");
                Ok(HealthStatus::Healthy)
            }
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    /// Confirms every delivered update with Telegram so a restart does not
    /// receive the last batch again.
    async fn shutdown(&self) -> Result<(), AdvisorError> {
        let floor = self.cursor.lock().await.floor();
        if floor == 0 {
            return Ok(());
        }

        let offset = i32::try_from(floor)
            .map_err(|e| AdvisorError::channel("update offset out of range", e))?;
        match self.bot.get_updates().offset(offset).limit(1).timeout(0).await {
            Ok(_) => debug!(offset, "confirmed delivered updates"),
            Err(e) => warn!(error = %e, "failed to confirm delivered updates"),
        }
        Ok(())
    }
}

#[async_trait]
impl EventSource for TelegramChannel {
    async fn fetch(&self, offset: u64, limit: usize) -> Result<Vec<Event>, AdvisorError> {
        let mut cursor = self.cursor.lock().await;
        let request_offset = cursor.request_offset(offset);
        let tg_offset = i32::try_from(request_offset)
            .map_err(|e| AdvisorError::channel("update offset out of range", e))?;
        let limit = limit.clamp(1, MAX_UPDATES_PER_CALL) as u8;

        let updates = self
            .bot
            .get_updates()
            .offset(tg_offset)
            .limit(limit)
            .timeout(self.config.long_poll_secs)
            .await
            .map_err(|e| AdvisorError::channel(format!("getUpdates failed: {e}"), e))?;

        let events: Vec<Event> = updates.iter().map(handler::to_event).collect();
        if let (Some(first), Some(last)) = (events.first(), events.last()) {
            cursor.observe(offset, first.id as i64, last.id as i64);
            debug!(
                offset,
                tg_offset,
                count = events.len(),
                first_id = first.id,
                last_id = last.id,
                "fetched Telegram updates"
            );
        }

        Ok(events)
    }
}

#[async_trait]
impl ReplySink for TelegramChannel {
    async fn reply(&self, chat_id: i64, text: &str) -> Result<(), AdvisorError> {
        let chunks = chunk::split_message(text, self.config.max_message_length);
        if chunks.len() > 1 {
            info!(chat_id, parts = chunks.len(), "splitting long reply");
        }

        for part in chunks {
            self.bot
                .send_message(ChatId(chat_id), part)
                .await
                .map_err(|e| AdvisorError::channel(format!("failed to send message: {e}"), e))?;
            metrics::counter!("advisor_replies_sent_total").increment(1);
        }
        Ok(())
    }
}
