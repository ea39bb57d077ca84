//! Slash command dispatch and response formatting.
//!
//! This module provides the command processing pipeline of the bot: Discord
//! users invoke a slash command, the [`Commander`] routes it to its handler and
//! the handler answers with a message built from the world status API.
//!
//! # Architecture
//!
//! ```text
//! Interaction (type 2)
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Commander  │  ← Entry point: dispatch()
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────────────┐
//! │ Action Handlers     │
//! │  - handle_ping      │
//! │  - handle_status    │
//! │  - handle_characters│
//! └─────────────────────┘
//!      │
//!      ▼
//! ┌────────────────────┐
//! │ InteractionResponse│
//! │  - text or embeds  │
//! └────────────────────┘
//! ```
//!
//! ## Available Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `/ping` | Check that the bot answers |
//! | `/status` | Worlds under maintenance or closed to new characters |
//! | `/characters` | Worlds closed to new characters |
//!
//! # Error Handling
//!
//! - Unknown commands produce a `400` problem document
//!   ([`ErrorResponse`](crate::server::ErrorResponse)).
//! - Status API failures never surface as errors: the user gets
//!   `Could not check availability.`
//!
//! # Module Organization
//!
//! - [`commander`] - Dispatcher
//! - [`command`] - Command enum
//! - [`actions`] - Individual command handler implementations
//! - [`embed_response`] - Response formatting

mod actions;
mod command;
mod commander;
mod embed_response;

pub use crate::commands::command::Command;
pub use crate::commands::commander::Commander;

/// Default embed title.
pub const DEFAULT_EMBED_TITLE: &str = "FFXIV World Status";

/// How status embeds look.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    /// Title of every embed
    pub title: String,
    /// Optional thumbnail shown in every embed
    pub thumbnail_url: Option<String>,
}

impl Default for Presentation {
    fn default() -> Self {
        Presentation {
            title: DEFAULT_EMBED_TITLE.to_owned(),
            thumbnail_url: None,
        }
    }
}
