// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Advisor task bot.
//!
//! This crate provides the trait definitions, error types, and common types
//! shared by the event consumer and its adapters. The Telegram source and the
//! SQLite store implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

pub use error::AdvisorError;
pub use types::{AdapterType, Event, EventKind, HealthStatus, SaveOutcome, Task};

pub use traits::{EventSource, OffsetStore, PluginAdapter, ReplySink, TaskStore};
