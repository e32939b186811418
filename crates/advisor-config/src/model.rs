// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Advisor task bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Advisor configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdvisorConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Telegram bot integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Event consumer loop settings.
    #[serde(default)]
    pub consumer: ConsumerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Liveness HTTP endpoint settings.
    #[serde(default)]
    pub health: HealthConfig,

    /// User-facing reply texts.
    #[serde(default)]
    pub replies: RepliesConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in logs.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "advisor".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required by `advisor serve`.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Override for the Bot API base URL (self-hosted Bot API servers, tests).
    #[serde(default)]
    pub api_url: Option<String>,

    /// Long-polling timeout passed to `getUpdates`, in seconds. 0 disables long polling.
    #[serde(default = "default_long_poll_secs")]
    pub long_poll_secs: u32,

    /// Maximum length of a single outgoing message; longer replies are split.
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_url: None,
            long_poll_secs: default_long_poll_secs(),
            max_message_length: default_max_message_length(),
        }
    }
}

fn default_long_poll_secs() -> u32 {
    10
}

fn default_max_message_length() -> usize {
    4096
}

/// Event consumer loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConsumerConfig {
    /// Checkpoint key under which the offset is persisted.
    #[serde(default = "default_consumer_name")]
    pub name: String,

    /// Maximum number of events fetched per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Pause after an empty batch, in milliseconds.
    #[serde(default = "default_idle_interval_ms")]
    pub idle_interval_ms: u64,

    /// Pause after a failed fetch, in milliseconds.
    #[serde(default = "default_backoff_interval_ms")]
    pub backoff_interval_ms: u64,

    /// Character that marks a message as a command.
    #[serde(default = "default_command_prefix")]
    pub command_prefix: char,

    /// Offset to start from when no checkpoint exists.
    #[serde(default)]
    pub initial_offset: u64,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            name: default_consumer_name(),
            batch_size: default_batch_size(),
            idle_interval_ms: default_idle_interval_ms(),
            backoff_interval_ms: default_backoff_interval_ms(),
            command_prefix: default_command_prefix(),
            initial_offset: 0,
        }
    }
}

fn default_consumer_name() -> String {
    "telegram".to_string()
}

fn default_batch_size() -> usize {
    100
}

fn default_idle_interval_ms() -> u64 {
    1000
}

fn default_backoff_interval_ms() -> u64 {
    1000
}

fn default_command_prefix() -> char {
    '/'
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("advisor").join("advisor.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("advisor.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Liveness HTTP endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HealthConfig {
    /// Serve the liveness endpoint alongside the consumer.
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,

    /// Address to bind.
    #[serde(default = "default_health_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_health_port")]
    pub port: u16,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            host: default_health_host(),
            port: default_health_port(),
        }
    }
}

fn default_health_enabled() -> bool {
    true
}

fn default_health_host() -> String {
    "0.0.0.0".to_string()
}

fn default_health_port() -> u16 {
    8080
}

/// User-facing reply texts, one per dispatcher outcome.
///
/// `deleted` must contain the `{task}` placeholder.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RepliesConfig {
    /// `{prefix}` is replaced with `consumer.command_prefix`.
    #[serde(default = "default_help")]
    pub help: String,

    /// Prepended to `help` for `/start`.
    #[serde(default = "default_greeting")]
    pub greeting: String,

    #[serde(default = "default_unknown_command")]
    pub unknown_command: String,

    #[serde(default = "default_no_saved_tasks")]
    pub no_saved_tasks: String,

    #[serde(default = "default_saved")]
    pub saved: String,

    #[serde(default = "default_already_exists")]
    pub already_exists: String,

    /// `{prefix}` is replaced with `consumer.command_prefix`.
    #[serde(default = "default_delete_usage")]
    pub delete_usage: String,

    #[serde(default = "default_invalid_number")]
    pub invalid_number: String,

    #[serde(default = "default_no_tasks")]
    pub no_tasks: String,

    #[serde(default = "default_no_such_task")]
    pub no_such_task: String,

    #[serde(default = "default_delete_failed")]
    pub delete_failed: String,

    #[serde(default = "default_deleted")]
    pub deleted: String,

    /// First line of the `/tasks` listing.
    #[serde(default = "default_list_header")]
    pub list_header: String,
}

impl Default for RepliesConfig {
    fn default() -> Self {
        Self {
            help: default_help(),
            greeting: default_greeting(),
            unknown_command: default_unknown_command(),
            no_saved_tasks: default_no_saved_tasks(),
            saved: default_saved(),
            already_exists: default_already_exists(),
            delete_usage: default_delete_usage(),
            invalid_number: default_invalid_number(),
            no_tasks: default_no_tasks(),
            no_such_task: default_no_such_task(),
            delete_failed: default_delete_failed(),
            deleted: default_deleted(),
            list_header: default_list_header(),
        }
    }
}

fn default_help() -> String {
    "I can save and keep your tasks.\n\n\
     To save a task, just send me a message like:\n\
     - do homework\n\
     - clean the room\n\
     - buy groceries\n\n\
     To get a random task from your list, send {prefix}rnd.\n\
     To see ALL your tasks in one message, send {prefix}tasks.\n\
     To delete a task by its number in that list, send {prefix}delete <number>."
        .to_string()
}

fn default_greeting() -> String {
    "Hi there! ✅".to_string()
}

fn default_unknown_command() -> String {
    "Unknown command 🤔".to_string()
}

fn default_no_saved_tasks() -> String {
    "You have no saved tasks 🙊".to_string()
}

fn default_saved() -> String {
    "Task saved! 👌".to_string()
}

fn default_already_exists() -> String {
    "You already have this task in your list 🤗".to_string()
}

fn default_delete_usage() -> String {
    "Usage: {prefix}delete <number>".to_string()
}

fn default_invalid_number() -> String {
    "Wrong number".to_string()
}

fn default_no_tasks() -> String {
    "You have no tasks".to_string()
}

fn default_no_such_task() -> String {
    "No task with this number".to_string()
}

fn default_delete_failed() -> String {
    "Can't delete task".to_string()
}

fn default_deleted() -> String {
    "🗑 Deleted: {task}".to_string()
}

fn default_list_header() -> String {
    "📝 Your tasks:".to_string()
}
