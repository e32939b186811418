// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Liveness HTTP endpoint built on axum.
//!
//! Serves `GET /` (plain text) and `GET /health` (JSON) so hosting platforms
//! can tell the bot process is up. It does not report on Telegram or storage.
//! `GET /metrics` renders Prometheus text when a recorder is installed.

use std::time::Instant;

use advisor_core::AdvisorError;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state for the liveness handlers.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: Instant,
    /// Renders `/metrics`; `None` answers 404.
    pub metrics: Option<PrometheusHandle>,
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
}

async fn get_root() -> &'static str {
    "Bot is running.\n"
}

async fn get_health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

async fn get_metrics(State(state): State<HealthState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Routes for the liveness endpoint.
pub fn router(state: HealthState) -> Router {
    Router::new()
        .route("/", get(get_root))
        .route("/health", get(get_health))
        .route("/metrics", get(get_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the listener up front so an occupied port fails startup.
pub async fn bind(host: &str, port: u16) -> Result<TcpListener, AdvisorError> {
    let addr = format!("{host}:{port}");
    TcpListener::bind(&addr)
        .await
        .map_err(|e| AdvisorError::Channel {
            message: format!("failed to bind health endpoint to {addr}: {e}"),
            source: Some(Box::new(e)),
        })
}

/// Serve until `cancel` fires.
pub async fn serve(
    listener: TcpListener,
    state: HealthState,
    cancel: CancellationToken,
) -> Result<(), AdvisorError> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "health endpoint listening");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| AdvisorError::Channel {
            message: format!("health endpoint error: {e}"),
            source: Some(Box::new(e)),
        })
}
