// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Advisor task bot.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, and miette
//! diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use advisor_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("batch size: {}", config.consumer.batch_size);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError, SourceFile};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::AdvisorConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// On figment errors, the TOML files are re-read so diagnostics can point
/// at the offending key.
pub fn load_and_validate() -> Result<AdvisorConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load configuration from a single file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<AdvisorConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        std::fs::read_to_string(path)
            .map(|content| vec![SourceFile::new(path.display().to_string(), content)])
            .unwrap_or_default()
    })
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<AdvisorConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![SourceFile::new("<inline>", toml_content)]
    })
}

fn finish(
    loaded: Result<AdvisorConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<SourceFile>,
) -> Result<AdvisorConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Serialize the effective configuration as TOML with secrets redacted.
pub fn to_redacted_toml(config: &AdvisorConfig) -> Result<String, toml::ser::Error> {
    let mut shown = config.clone();
    if shown.telegram.bot_token.is_some() {
        shown.telegram.bot_token = Some("<redacted>".to_string());
    }
    toml::to_string_pretty(&shown)
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources() -> Vec<SourceFile> {
    let mut candidates = vec![std::path::PathBuf::from("/etc/advisor/advisor.toml")];
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("advisor/advisor.toml"));
    }
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join("advisor.toml"));
    }

    candidates
        .into_iter()
        .filter_map(|path| {
            std::fs::read_to_string(&path)
                .ok()
                .map(|content| SourceFile::new(path.display().to_string(), content))
        })
        .collect()
}
