// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Advisor integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without a Telegram connection.
//!
//! # Components
//!
//! - [`MockEventSource`] - Scripted event stream with failure injection
//! - [`RecordingSink`] - Reply sink that captures every reply
//! - [`MemoryTaskStore`] / [`MemoryOffsetStore`] - In-memory stores with failure injection
//! - [`TestHarness`] - Full pipeline over a temp SQLite database

pub mod harness;
pub mod memory_store;
pub mod mock_channel;

pub use harness::TestHarness;
pub use memory_store::{MemoryOffsetStore, MemoryTaskStore, StoreOp};
pub use mock_channel::{MockEventSource, RecordingSink};
