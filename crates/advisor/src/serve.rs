// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `advisor serve` command implementation.
//!
//! Opens and checks the task store, connects the Telegram adapter, starts
//! the liveness endpoint, and runs the event consumer until a shutdown
//! signal arrives.

use std::sync::Arc;

use advisor_config::model::AdvisorConfig;
use advisor_consumer::shutdown;
use advisor_consumer::{ConsumerSettings, Dispatcher, EventConsumer, Replies};
use advisor_core::error::AdvisorError;
use advisor_core::{EventSource, HealthStatus, OffsetStore, PluginAdapter, ReplySink, TaskStore};
use advisor_storage::SqliteStorage;
use advisor_telegram::TelegramChannel;
use tracing::{error, info, warn};

use crate::health::{self, HealthState};
use crate::telemetry;

/// Runs the `advisor serve` command.
pub async fn run_serve(config: AdvisorConfig) -> Result<(), AdvisorError> {
    init_tracing(&config.agent.log_level);
    info!(name = %config.agent.name, "advisor starting");
    let prometheus = telemetry::install_recorder();

    if config.telegram.bot_token.is_none() {
        error!("no bot token: set telegram.bot_token, ADVISOR_TELEGRAM_BOT_TOKEN or --token");
        return Err(AdvisorError::Config(
            "telegram.bot_token is required for serve".into(),
        ));
    }

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    if let Err(e) = open_storage(&storage).await {
        error!(path = %config.storage.database_path, error = %e, "task store unavailable");
        return Err(e);
    }
    info!(
        adapter = %describe(&*storage),
        path = %config.storage.database_path,
        "task store ready"
    );

    let telegram = Arc::new(TelegramChannel::new(config.telegram.clone())?);
    match telegram.health_check().await? {
        HealthStatus::Healthy => info!(adapter = %describe(&*telegram), "adapter connected"),
        HealthStatus::Unhealthy(reason) => {
            warn!(reason = %reason, "Telegram not reachable yet, the consumer will retry");
        }
    }

    let cancel = shutdown::install_signal_handler();

    let health_task = if config.health.enabled {
        let listener = health::bind(&config.health.host, config.health.port).await?;
        let health_cancel = cancel.clone();
        let mut state = HealthState::new();
        if let Some(handle) = prometheus {
            state = state.with_metrics(handle);
        }
        Some(tokio::spawn(async move {
            if let Err(e) = health::serve(listener, state, health_cancel).await {
                warn!(error = %e, "health endpoint stopped");
            }
        }))
    } else {
        info!("health endpoint disabled");
        None
    };

    let mut consumer = build_consumer(
        &config,
        telegram.clone(),
        telegram.clone(),
        storage.clone(),
        storage.clone(),
    );
    let offset = consumer.resume().await?;
    info!(offset, "consumer positioned");

    let result = consumer.run(cancel.clone()).await;

    // Stop the health endpoint even when the consumer exited on its own.
    cancel.cancel();
    if let Some(task) = health_task
        && let Err(e) = task.await
    {
        warn!(error = %e, "health endpoint task failed");
    }

    if let Err(e) = telegram.shutdown().await {
        warn!(error = %e, "Telegram adapter shutdown failed");
    }
    if let Err(e) = storage.close().await {
        warn!(error = %e, "task store close failed");
    }

    result?;
    info!("advisor serve shutdown complete");
    Ok(())
}

/// Opens, migrates and health-checks the store.
async fn open_storage(storage: &SqliteStorage) -> Result<(), AdvisorError> {
    storage.initialize().await?;
    match storage.health_check().await? {
        HealthStatus::Healthy => Ok(()),
        HealthStatus::Unhealthy(reason) => Err(AdvisorError::Storage {
            source: reason.into(),
        }),
    }
}

/// `name version (role)` for startup logs.
fn describe(adapter: &dyn PluginAdapter) -> String {
    format!(
        "{} {} ({})",
        adapter.name(),
        adapter.version(),
        adapter.adapter_type()
    )
}

/// Wires a consumer from configuration and adapters.
fn build_consumer(
    config: &AdvisorConfig,
    source: Arc<dyn EventSource>,
    sink: Arc<dyn ReplySink>,
    tasks: Arc<dyn TaskStore>,
    offsets: Arc<dyn OffsetStore>,
) -> EventConsumer {
    let dispatcher = Dispatcher::new(
        tasks,
        sink,
        Replies::new(config.replies.clone(), config.consumer.command_prefix),
        config.consumer.command_prefix,
    );
    EventConsumer::new(
        source,
        dispatcher,
        offsets,
        ConsumerSettings::from(&config.consumer),
    )
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("advisor={log_level},warn")));

    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serve_without_token_fails_fast() {
        let mut config = AdvisorConfig::default();
        config.telegram.bot_token = None;

        let err = run_serve(config).await.unwrap_err();
        assert!(matches!(err, AdvisorError::Config(_)));
    }

    #[tokio::test]
    async fn serve_fails_when_store_cannot_open() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the database directory should be.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        let mut config = AdvisorConfig::default();
        config.telegram.bot_token = Some("123:abc".into());
        config.storage.database_path = blocker.join("advisor.db").to_string_lossy().into_owned();

        let err = run_serve(config).await.unwrap_err();
        assert!(matches!(err, AdvisorError::Storage { .. }));
    }

    #[test]
    fn describe_names_adapter_version_and_role() {
        let source = advisor_test_utils::MockEventSource::new();
        assert_eq!(describe(&source), "mock-source 0.1.0 (EventSource)");

        let storage = SqliteStorage::new(AdvisorConfig::default().storage);
        assert_eq!(describe(&storage), "sqlite 0.1.0 (Storage)");
    }

    #[tokio::test]
    async fn open_storage_migrates_and_checks() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AdvisorConfig::default();
        config.storage.database_path = dir.path().join("t.db").to_string_lossy().into_owned();

        let storage = SqliteStorage::new(config.storage.clone());
        open_storage(&storage).await.unwrap();
        assert!(storage.list_all("alice").await.unwrap().is_empty());
    }
}
