// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as batch size limits, the command prefix shape, and reply templates.

use crate::diagnostic::ConfigError;
use crate::model::AdvisorConfig;

/// Telegram's `getUpdates` accepts at most 100 updates per call.
pub const MAX_BATCH_SIZE: usize = 100;

/// Upper bound for long polling; the Bot API client times out shortly after.
pub const MAX_LONG_POLL_SECS: u32 = 15;

/// Smallest accepted `telegram.max_message_length`.
pub const MIN_MESSAGE_LENGTH: usize = 64;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &AdvisorConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.consumer.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "consumer.name must not be empty".to_string(),
        });
    }

    let batch_size = config.consumer.batch_size;
    if batch_size == 0 || batch_size > MAX_BATCH_SIZE {
        errors.push(ConfigError::Validation {
            message: format!(
                "consumer.batch_size must be between 1 and {MAX_BATCH_SIZE}, got {batch_size}"
            ),
        });
    }

    let prefix = config.consumer.command_prefix;
    if prefix.is_alphanumeric() || prefix.is_whitespace() {
        errors.push(ConfigError::Validation {
            message: format!(
                "consumer.command_prefix must be a punctuation character, got `{prefix}`"
            ),
        });
    }

    if config.telegram.long_poll_secs > MAX_LONG_POLL_SECS {
        errors.push(ConfigError::Validation {
            message: format!(
                "telegram.long_poll_secs must be at most {MAX_LONG_POLL_SECS}, got {}",
                config.telegram.long_poll_secs
            ),
        });
    }

    if config.telegram.max_message_length < MIN_MESSAGE_LENGTH {
        errors.push(ConfigError::Validation {
            message: format!(
                "telegram.max_message_length must be at least {MIN_MESSAGE_LENGTH}, got {}",
                config.telegram.max_message_length
            ),
        });
    }

    if let Some(token) = &config.telegram.bot_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "telegram.bot_token must not be empty when set".to_string(),
        });
    }

    let replies = &config.replies;
    let texts = [
        ("help", &replies.help),
        ("greeting", &replies.greeting),
        ("unknown_command", &replies.unknown_command),
        ("no_saved_tasks", &replies.no_saved_tasks),
        ("saved", &replies.saved),
        ("already_exists", &replies.already_exists),
        ("delete_usage", &replies.delete_usage),
        ("invalid_number", &replies.invalid_number),
        ("no_tasks", &replies.no_tasks),
        ("no_such_task", &replies.no_such_task),
        ("delete_failed", &replies.delete_failed),
        ("deleted", &replies.deleted),
        ("list_header", &replies.list_header),
    ];
    for (key, text) in texts {
        if text.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("replies.{key} must not be empty"),
            });
        }
    }

    if !replies.deleted.contains("{task}") {
        errors.push(ConfigError::Validation {
            message: "replies.deleted must contain the `{task}` placeholder".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = AdvisorConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = AdvisorConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "database_path"));
    }

    #[test]
    fn batch_size_bounds() {
        let mut config = AdvisorConfig::default();
        config.consumer.batch_size = 0;
        assert!(has_error(&validate_config(&config).unwrap_err(), "batch_size"));

        config.consumer.batch_size = 101;
        assert!(has_error(&validate_config(&config).unwrap_err(), "batch_size"));

        config.consumer.batch_size = 1;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn alphanumeric_prefix_is_rejected() {
        let mut config = AdvisorConfig::default();
        config.consumer.command_prefix = 'c';
        assert!(has_error(&validate_config(&config).unwrap_err(), "command_prefix"));

        config.consumer.command_prefix = '!';
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn deleted_template_needs_placeholder() {
        let mut config = AdvisorConfig::default();
        config.replies.deleted = "Deleted".to_string();
        assert!(has_error(&validate_config(&config).unwrap_err(), "{task}"));
    }

    #[test]
    fn empty_reply_text_is_rejected() {
        let mut config = AdvisorConfig::default();
        config.replies.saved = "  ".to_string();
        assert!(has_error(&validate_config(&config).unwrap_err(), "replies.saved"));
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = AdvisorConfig::default();
        config.storage.database_path = "".to_string();
        config.consumer.batch_size = 0;
        config.telegram.long_poll_secs = 60;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn empty_bot_token_is_rejected() {
        let mut config = AdvisorConfig::default();
        config.telegram.bot_token = Some(String::new());
        assert!(has_error(&validate_config(&config).unwrap_err(), "bot_token"));
    }
}
