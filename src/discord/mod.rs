//! Discord integration.
//!
//! This module contains everything specific to the Discord interactions
//! platform: the webhook payload and response types, the request signature
//! verification, and the REST client used to (de)register application commands.
//!
//! # Modules
//!
//! - `interaction` - Inbound interaction payloads and interaction responses
//! - `verify` - Ed25519 request signature verification
//! - `client` - REST client for application command registration

mod client;
mod interaction;
mod verify;

pub use crate::discord::client::{CommandDefinition, DiscordClient, RegisteredCommand};
pub use crate::discord::interaction::{
    CommandData, Embed, EmbedField, Interaction, InteractionResponse, InteractionType,
    ResponseData, Thumbnail,
};
#[cfg(test)]
pub use crate::discord::verify::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
pub use crate::discord::verify::RequestVerifier;

/// Errors raised by the Discord REST client.
#[derive(Debug, thiserror::Error)]
pub enum DiscordError {
    /// The bot token cannot be used as a header value.
    #[error("bot token contains invalid characters")]
    InvalidToken,
    /// The request could not be sent or the response could not be read.
    #[error("could not send request to Discord: {0}")]
    Http(#[from] reqwest::Error),
    /// Discord answered with a non-success status.
    #[error("Discord responded with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}
