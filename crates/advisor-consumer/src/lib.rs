// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event consumer loop and command dispatch for the Advisor task bot.
//!
//! The [`EventConsumer`] is the central coordinator that:
//! - Fetches bounded batches from an [`EventSource`] at its current offset
//! - Dispatches every event of a batch in order through the [`Dispatcher`]
//! - Advances the offset by the batch size and checkpoints it
//! - Backs off on fetch errors, idles on empty batches, and stops on cancellation

pub mod command;
pub mod dispatcher;
pub mod replies;
pub mod shutdown;

use std::sync::Arc;
use std::time::Duration;

use advisor_config::model::ConsumerConfig;
use advisor_core::error::AdvisorError;
use advisor_core::types::Event;
use advisor_core::{EventSource, OffsetStore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub use command::Command;
pub use dispatcher::Dispatcher;
pub use replies::Replies;

/// Loop tuning, derived from `[consumer]` configuration.
#[derive(Debug, Clone)]
pub struct ConsumerSettings {
    /// Checkpoint key.
    pub name: String,
    pub batch_size: usize,
    pub idle_interval: Duration,
    pub backoff_interval: Duration,
    /// Offset used when no checkpoint exists.
    pub initial_offset: u64,
}

impl From<&ConsumerConfig> for ConsumerSettings {
    fn from(config: &ConsumerConfig) -> Self {
        Self {
            name: config.name.clone(),
            batch_size: config.batch_size,
            idle_interval: Duration::from_millis(config.idle_interval_ms),
            backoff_interval: Duration::from_millis(config.backoff_interval_ms),
            initial_offset: config.initial_offset,
        }
    }
}

/// Single-consumer offset-tracking loop.
///
/// The offset only moves forward, and only by the number of events fetched
/// in a batch, after every event of that batch has been dispatched.
pub struct EventConsumer {
    source: Arc<dyn EventSource>,
    dispatcher: Dispatcher,
    offsets: Arc<dyn OffsetStore>,
    settings: ConsumerSettings,
    offset: u64,
}

impl EventConsumer {
    /// Creates a consumer positioned at `settings.initial_offset`.
    ///
    /// Call [`resume`](Self::resume) to continue from a stored checkpoint.
    pub fn new(
        source: Arc<dyn EventSource>,
        dispatcher: Dispatcher,
        offsets: Arc<dyn OffsetStore>,
        settings: ConsumerSettings,
    ) -> Self {
        let offset = settings.initial_offset;
        Self {
            source,
            dispatcher,
            offsets,
            settings,
            offset,
        }
    }

    /// Loads the checkpoint for this consumer, falling back to the initial offset.
    pub async fn resume(&mut self) -> Result<u64, AdvisorError> {
        match self.offsets.load_offset(&self.settings.name).await? {
            Some(stored) => {
                self.offset = stored;
                info!(consumer = %self.settings.name, offset = stored, "resuming from checkpoint");
            }
            None => {
                self.offset = self.settings.initial_offset;
                info!(
                    consumer = %self.settings.name,
                    offset = self.offset,
                    "no checkpoint found, starting from initial offset"
                );
            }
        }
        Ok(self.offset)
    }

    /// The offset the next fetch starts from.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Runs the loop until `cancel` fires.
    ///
    /// Cancellation interrupts a pending fetch or pause. A batch that is
    /// already being dispatched is finished and checkpointed first.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), AdvisorError> {
        info!(
            consumer = %self.settings.name,
            source = self.source.name(),
            offset = self.offset,
            batch_size = self.settings.batch_size,
            "event consumer running"
        );

        while !cancel.is_cancelled() {
            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                result = self.source.fetch(self.offset, self.settings.batch_size) => result,
            };

            match fetched {
                Err(e) => {
                    metrics::counter!("advisor_fetch_errors_total").increment(1);
                    warn!(offset = self.offset, error = %e, "fetch failed, backing off");
                    if pause(self.settings.backoff_interval, &cancel).await {
                        break;
                    }
                }
                Ok(events) if events.is_empty() => {
                    if pause(self.settings.idle_interval, &cancel).await {
                        break;
                    }
                }
                Ok(events) => {
                    self.process_batch(&events).await;
                }
            }
        }

        info!(
            consumer = %self.settings.name,
            offset = self.offset,
            "event consumer stopped"
        );
        Ok(())
    }

    /// Dispatches a fetched batch in order, then advances and checkpoints the offset.
    ///
    /// Returns the number of events that failed to dispatch.
    pub async fn process_batch(&mut self, events: &[Event]) -> usize {
        metrics::counter!("advisor_events_fetched_total").increment(events.len() as u64);

        let mut failed = 0;
        for event in events {
            if let Err(e) = self.dispatcher.dispatch(event).await {
                failed += 1;
                metrics::counter!("advisor_dispatch_errors_total").increment(1);
                match e {
                    AdvisorError::UnsupportedEvent { id } => {
                        debug!(event_id = id, "skipping unsupported event");
                    }
                    e => warn!(event_id = event.id, error = %e, "failed to handle event"),
                }
            }
        }

        self.offset = self.offset.saturating_add(events.len() as u64);
        debug!(
            offset = self.offset,
            count = events.len(),
            failed,
            "batch processed"
        );

        if let Err(e) = self
            .offsets
            .save_offset(&self.settings.name, self.offset)
            .await
        {
            warn!(offset = self.offset, error = %e, "failed to checkpoint offset");
        }

        failed
    }
}

/// Sleeps for `duration` unless cancelled first. Returns true if cancelled.
async fn pause(duration: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => true,
        _ = tokio::time::sleep(duration) => false,
    }
}
