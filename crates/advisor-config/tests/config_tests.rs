// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Advisor configuration system.

use advisor_config::diagnostic::ConfigError;
use advisor_config::model::AdvisorConfig;
use advisor_config::{load_and_validate_str, load_config_from_str, to_redacted_toml};

/// Valid TOML with all known sections deserializes successfully.
#[test]
fn valid_toml_deserializes_into_advisor_config() {
    let toml = r#"
[agent]
name = "tasks-bot"
log_level = "debug"

[telegram]
bot_token = "123:ABC"
long_poll_secs = 5
max_message_length = 2048

[consumer]
name = "primary"
batch_size = 50
idle_interval_ms = 250
backoff_interval_ms = 2000
command_prefix = "!"
initial_offset = 42

[storage]
database_path = "/tmp/advisor-test.db"
wal_mode = false

[health]
enabled = false
host = "127.0.0.1"
port = 9000

[replies]
saved = "Got it."
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "tasks-bot");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:ABC"));
    assert_eq!(config.telegram.long_poll_secs, 5);
    assert_eq!(config.telegram.max_message_length, 2048);
    assert_eq!(config.consumer.name, "primary");
    assert_eq!(config.consumer.batch_size, 50);
    assert_eq!(config.consumer.idle_interval_ms, 250);
    assert_eq!(config.consumer.backoff_interval_ms, 2000);
    assert_eq!(config.consumer.command_prefix, '!');
    assert_eq!(config.consumer.initial_offset, 42);
    assert_eq!(config.storage.database_path, "/tmp/advisor-test.db");
    assert!(!config.storage.wal_mode);
    assert!(!config.health.enabled);
    assert_eq!(config.health.port, 9000);
    assert_eq!(config.replies.saved, "Got it.");
    // Untouched replies keep their defaults.
    assert_eq!(config.replies.delete_usage, "Usage: {prefix}delete <number>");
}

/// Missing optional sections use defaults without error.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.agent.name, "advisor");
    assert_eq!(config.agent.log_level, "info");
    assert!(config.telegram.bot_token.is_none());
    assert_eq!(config.telegram.long_poll_secs, 10);
    assert_eq!(config.telegram.max_message_length, 4096);
    assert_eq!(config.consumer.batch_size, 100);
    assert_eq!(config.consumer.idle_interval_ms, 1000);
    assert_eq!(config.consumer.backoff_interval_ms, 1000);
    assert_eq!(config.consumer.command_prefix, '/');
    assert_eq!(config.consumer.initial_offset, 0);
    assert!(config.storage.database_path.ends_with("advisor.db"));
    assert!(config.storage.wal_mode);
    assert!(config.health.enabled);
    assert_eq!(config.health.port, 8080);
    assert!(config.replies.deleted.contains("{task}"));
}

#[test]
fn unknown_field_in_consumer_is_rejected() {
    let toml = r#"
[consumer]
batch_sise = 10
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("batch_sise"),
        "error should mention the unknown field, got: {err_str}"
    );
}

#[test]
fn unknown_top_level_section_is_rejected() {
    let toml = r#"
[logging]
level = "debug"
"#;

    assert!(load_config_from_str(toml).is_err());
}

/// Env overrides land on `telegram.bot_token`, not `telegram.bot.token`.
#[test]
fn env_var_overrides_bot_token() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("ADVISOR_TELEGRAM_BOT_TOKEN", "xyz-from-env");
        jail.set_env("ADVISOR_CONSUMER_BATCH_SIZE", "25");

        let config = advisor_config::load_config().expect("env overrides should load");
        assert_eq!(config.telegram.bot_token.as_deref(), Some("xyz-from-env"));
        assert_eq!(config.consumer.batch_size, 25);
        Ok(())
    });
}

/// `./advisor.toml` is picked up, and env vars win over it.
#[test]
fn local_file_then_env_precedence() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "advisor.toml",
            r#"
[consumer]
batch_size = 10
idle_interval_ms = 500
"#,
        )?;
        jail.set_env("ADVISOR_CONSUMER_BATCH_SIZE", "20");

        let config = advisor_config::load_config().expect("should load");
        assert_eq!(config.consumer.batch_size, 20);
        assert_eq!(config.consumer.idle_interval_ms, 500);
        Ok(())
    });
}

/// The token env var validates cleanly and also applies on top of `--config`.
#[test]
fn env_token_passes_validation_with_and_without_explicit_path() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("ADVISOR_TELEGRAM_BOT_TOKEN", "123:abc");
        jail.set_env("ADVISOR_HEALTH_PORT", "9090");

        let config = advisor_config::load_and_validate().expect("env token should be accepted");
        assert_eq!(config.telegram.bot_token.as_deref(), Some("123:abc"));
        assert_eq!(config.health.port, 9090);

        jail.create_file("custom.toml", "[consumer]\nbatch_size = 5\n")?;
        let config = advisor_config::load_and_validate_path(std::path::Path::new("custom.toml"))
            .expect("env token should be accepted with an explicit file");
        assert_eq!(config.telegram.bot_token.as_deref(), Some("123:abc"));
        assert_eq!(config.consumer.batch_size, 5);
        Ok(())
    });
}

#[test]
fn explicit_path_is_validated() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "custom.toml",
            r#"
[consumer]
batch_size = 500
"#,
        )?;

        let errors = advisor_config::load_and_validate_path(std::path::Path::new("custom.toml"))
            .expect_err("batch_size above 100 should fail validation");
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("batch_size"))
        ));
        Ok(())
    });
}

#[test]
fn missing_config_files_are_skipped() {
    figment::Jail::expect_with(|_jail| {
        let config = advisor_config::load_and_validate().expect("defaults should validate");
        assert_eq!(config.agent.name, "advisor");
        Ok(())
    });
}

#[test]
fn diagnostic_unknown_key_carries_suggestion_and_span() {
    let toml = r#"
[consumer]
batch_sise = 10
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                key,
                suggestion,
                valid_keys,
                span,
                ..
            } => Some((key, suggestion, valid_keys, span)),
            _ => None,
        })
        .expect("should have an UnknownKey error");

    assert_eq!(unknown.0, "batch_sise");
    assert_eq!(unknown.1.as_deref(), Some("batch_size"));
    assert!(unknown.2.contains("command_prefix"));
    assert!(unknown.3.is_some(), "inline source should be located");
}

#[test]
fn diagnostic_invalid_type_names_the_key() {
    let toml = r#"
[consumer]
batch_size = "lots"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::InvalidType { key, .. } if key.contains("batch_size")
    )));
}

#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "prot".to_string(),
        suggestion: Some("port".to_string()),
        valid_keys: "enabled, host, port".to_string(),
        span: None,
        src: None,
    };

    assert!(error.code().is_some());
    let help = error.help().expect("should have help text").to_string();
    assert!(help.contains("did you mean `port`"), "got: {help}");

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("prot"));
}

#[test]
fn validation_errors_surface_from_str_loader() {
    let toml = r#"
[consumer]
command_prefix = "x"

[replies]
deleted = "Deleted!"
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(errors.len() >= 2, "got: {errors:?}");
}

#[test]
fn redacted_toml_hides_token_and_round_trips() {
    let mut config = AdvisorConfig::default();
    config.telegram.bot_token = Some("123:SECRET".to_string());
    config.consumer.batch_size = 7;

    let rendered = to_redacted_toml(&config).expect("should serialize");
    assert!(!rendered.contains("SECRET"));
    assert!(rendered.contains("<redacted>"));

    let parsed = load_config_from_str(&rendered).expect("rendered TOML should parse");
    assert_eq!(parsed.consumer.batch_size, 7);
}
