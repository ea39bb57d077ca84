//! Command action handlers.
//!
//! Individual handler functions for each bot command. Each handler builds the
//! [`InteractionResponse`](crate::discord::InteractionResponse) written back to
//! Discord. Handlers never fail: upstream errors are logged and turned into an
//! apology message.
//!
//! # Available Handlers
//!
//! - [`handle_ping`] - Answer `Pong.`
//! - [`handle_status`] - Show worlds under maintenance or closed to new characters
//! - [`handle_characters`] - Show worlds closed to new characters

mod characters;
mod ping;
mod status;

pub use crate::commands::actions::{
    characters::handle_characters, ping::handle_ping, status::handle_status,
};
