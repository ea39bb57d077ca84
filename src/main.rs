//! ffxiv-status - A Discord bot reporting FINAL FANTASY XIV world status.
//!
//! This is the main entry point of the bot, which answers Discord slash commands
//! with the state of the game worlds fetched from a world status API.
//!
//! # Overview
//!
//! Discord delivers slash command invocations to an HTTP endpoint
//! (`POST /interactions`). The bot verifies the request signature, runs the
//! invoked command and answers with a message listing the worlds under
//! maintenance or closed to new characters, grouped by data center.
//!
//! # Features
//!
//! - **Slash Commands**: `/ping`, `/status` and `/characters`, registered on startup
//!   and deleted on shutdown
//! - **Request Verification**: Ed25519 signature check of every interaction
//! - **Grouped Embeds**: One embed per section, one field per data center
//! - **Graceful Shutdown**: In-flight requests get a grace period on SIGINT/SIGTERM
//! - **YAML Configuration**: Simple configuration file format with environment variable support
//!
//! # Configuration
//!
//! Create a `config.yaml` file with your settings:
//!
//! ```yaml
//! api:
//!   url: "https://ffxiv.example.com/api/"
//!
//! discord:
//!   application_id: "123456789012345678"
//!   token_file: "/run/secrets/discord_token"
//!   public_key: "e5f1..."
//!
//! server:
//!   listen_address: "0.0.0.0:8080"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Override any configuration value using environment variables with the
//! `FFXIV_STATUS_` prefix:
//!
//! ```bash
//! export FFXIV_STATUS_API__TOKEN="api-key"
//! export FFXIV_STATUS_DISCORD__TOKEN="bot-token"
//! export FFXIV_STATUS_DISCORD__PUBLIC_KEY="e5f1..."
//! ```
//!
//! # Usage
//!
//! ```bash
//! ffxiv-status --config config.yaml
//! ```
//!
//! # Architecture
//!
//! The bot consists of several modules:
//!
//! - [`bot`] - Startup composition and shutdown sequence
//! - [`commands`] - Slash command dispatch and embed formatting
//! - [`config`] - YAML configuration file structures and loading with environment variable support
//! - [`discord`] - Interaction payloads, signature verification and REST client
//! - [`ffxiv`] - World status API client
//! - [`server`] - Interaction HTTP server
//! - [`utils`] - Secret resolution
//!
//! # Exit Codes
//!
//! - `0` - Stopped by SIGINT or SIGTERM
//! - `1` - Invalid configuration, startup failure or server failure
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)
//!   - Set to `debug` for verbose output
//!   - Set to `warn` or `error` for minimal logging

use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{bot::Bot, config::Config};

mod bot;
mod commands;
mod config;
mod discord;
mod ffxiv;
mod server;
mod utils;

/// Command-line arguments of the bot.
///
/// Everything else is configured through the YAML file (see [`config::Config`]).
///
/// # Examples
///
/// ```bash
/// ffxiv-status --config config.yaml
/// ```
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    ///
    /// Values can be overridden with `FFXIV_STATUS_` environment variables,
    /// e.g. `FFXIV_STATUS_DISCORD__TOKEN`.
    #[arg(short, long)]
    config: String,
}

/// Main entry point of the bot.
///
/// 1. **Logging Setup**: `info` level by default, overridden by `RUST_LOG`
/// 2. **Argument Parsing**: Parses command-line arguments using `clap`
/// 3. **Configuration Loading**: Reads the YAML file and the environment overrides
/// 4. **Bot Initialization**: Builds the components and registers the slash commands
/// 5. **Bot Execution**: Serves interactions until shutdown
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug ffxiv-status --config config.yaml
/// ```
#[tokio::main]
async fn main() -> ExitCode {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting ffxiv-status {}...", env!("CARGO_PKG_VERSION"));

    // Parse command line arguments
    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Launch bot
    let bot = match Bot::new(config).await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to initialize bot: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let reason = bot.run().await;
    info!("Stopped ({:?})", reason);

    ExitCode::from(reason.exit_code())
}
