// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Advisor - a Telegram bot that keeps a per-user list of tasks.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod health;
mod serve;
mod telemetry;

use std::path::{Path, PathBuf};

use advisor_config::{AdvisorConfig, ConfigError};
use clap::{Parser, Subcommand};

/// Advisor - a Telegram bot that keeps a per-user list of tasks.
#[derive(Parser, Debug)]
#[command(name = "advisor", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the bot.
    Serve {
        /// Load configuration from this file instead of the standard locations.
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Telegram bot token.
        #[arg(long, env = "ADVISOR_TELEGRAM_BOT_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Port for the liveness endpoint.
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },
    /// Print the effective configuration with secrets redacted.
    Config {
        /// Load configuration from this file instead of the standard locations.
        #[arg(long, short)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve {
            config,
            token,
            port,
        }) => {
            let mut config = load_or_exit(config.as_deref());
            apply_overrides(&mut config, token, port);
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("advisor: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config { config }) => {
            let config = load_or_exit(config.as_deref());
            match advisor_config::to_redacted_toml(&config) {
                Ok(toml) => print!("{toml}"),
                Err(e) => {
                    eprintln!("advisor: failed to render configuration: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => {
            println!("advisor: use --help for available commands");
        }
    }
}

fn load(path: Option<&Path>) -> Result<AdvisorConfig, Vec<ConfigError>> {
    match path {
        Some(path) => advisor_config::load_and_validate_path(path),
        None => advisor_config::load_and_validate(),
    }
}

fn load_or_exit(path: Option<&Path>) -> AdvisorConfig {
    match load(path) {
        Ok(config) => config,
        Err(errors) => {
            advisor_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

/// Command-line flags win over every configuration layer.
fn apply_overrides(config: &mut AdvisorConfig, token: Option<String>, port: Option<u16>) {
    if let Some(token) = token {
        config.telegram.bot_token = Some(token);
    }
    if let Some(port) = port {
        config.health.port = port;
    }
}
