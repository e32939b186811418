// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./advisor.toml` > `~/.config/advisor/advisor.toml` > `/etc/advisor/advisor.toml`
//! with environment variable overrides via `ADVISOR_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::AdvisorConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/advisor/advisor.toml` (system-wide)
/// 3. `~/.config/advisor/advisor.toml` (user XDG config)
/// 4. `./advisor.toml` (local directory)
/// 5. `ADVISOR_*` environment variables
pub fn load_config() -> Result<AdvisorConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<AdvisorConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AdvisorConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AdvisorConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AdvisorConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The full provider stack behind [`load_config`].
fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(AdvisorConfig::default()))
        .merge(Toml::file("/etc/advisor/advisor.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("advisor/advisor.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("advisor.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `ADVISOR_TELEGRAM_BOT_TOKEN` must map to `telegram.bot_token`,
/// not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("ADVISOR_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a prefix-stripped env var name to its dotted config path.
///
/// Figment hands keys over in their original case, so they are lowercased here.
pub(crate) fn map_env_key(key: &str) -> String {
    const SECTIONS: [&str; 6] = ["agent", "telegram", "consumer", "storage", "health", "replies"];

    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key
}
