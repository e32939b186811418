// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Advisor task bot.

use thiserror::Error;

/// The primary error type used across all Advisor adapter traits and core operations.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// Configuration errors (invalid TOML, missing bot token, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migrations).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel adapter errors (fetching updates, sending replies, rate limiting).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The event carries no chat message the dispatcher can act on.
    #[error("unsupported event {id}")]
    UnsupportedEvent { id: u64 },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },
}

impl AdvisorError {
    /// Wraps any storage-layer error.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        AdvisorError::Storage {
            source: Box::new(err),
        }
    }

    /// Builds a channel error with a message and the originating error.
    pub fn channel<E>(message: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        AdvisorError::Channel {
            message: message.into(),
            source: Some(Box::new(err)),
        }
    }
}
