// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! All adapters use `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod source;
pub mod store;

pub use adapter::PluginAdapter;
pub use source::{EventSource, ReplySink};
pub use store::{OffsetStore, TaskStore};
