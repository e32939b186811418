// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prometheus recorder for the consumer's `metrics` counters.
//!
//! The rendered text is served on the liveness endpoint's `/metrics` route.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{info, warn};

/// Installs the process-wide Prometheus recorder.
///
/// Only one recorder can exist per process. If installation fails the bot
/// runs on without metrics.
pub fn install_recorder() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            describe_metrics();
            info!("prometheus metrics recorder installed");
            Some(handle)
        }
        Err(e) => {
            warn!(error = %e, "failed to install Prometheus recorder, metrics disabled");
            None
        }
    }
}

fn describe_metrics() {
    metrics::describe_counter!(
        "advisor_events_fetched_total",
        "Events fetched from the event source"
    );
    metrics::describe_counter!(
        "advisor_dispatch_errors_total",
        "Events whose dispatch failed"
    );
    metrics::describe_counter!(
        "advisor_fetch_errors_total",
        "Failed fetches from the event source"
    );
    metrics::describe_counter!("advisor_replies_sent_total", "Reply messages sent");
}
