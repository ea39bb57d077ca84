//! Interaction payloads and responses.
//!
//! Only the fields the bot reads are decoded; Discord sends many more and they
//! are ignored.

use serde::{Deserialize, Serialize};

const INTERACTION_PING: u8 = 1;
const INTERACTION_APPLICATION_COMMAND: u8 = 2;

const RESPONSE_PONG: u8 = 1;
const RESPONSE_CHANNEL_MESSAGE_WITH_SOURCE: u8 = 4;

/// Inbound webhook event.
#[derive(Deserialize, Debug, Clone)]
pub struct Interaction {
    /// Raw interaction type discriminant.
    #[serde(rename = "type")]
    pub kind: u8,
    /// Type specific payload, decoded once the type is known.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Interaction kinds the bot distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionType {
    /// Connectivity handshake sent when the endpoint is configured
    Ping,
    /// Slash command invoked by a user
    ApplicationCommand,
    /// Any other interaction (components, autocomplete, modals...)
    Unsupported(u8),
}

impl Interaction {
    /// Returns the interaction kind.
    pub fn interaction_type(&self) -> InteractionType {
        match self.kind {
            INTERACTION_PING => InteractionType::Ping,
            INTERACTION_APPLICATION_COMMAND => InteractionType::ApplicationCommand,
            other => InteractionType::Unsupported(other),
        }
    }

    /// Decodes the payload of an application command.
    ///
    /// Returns `None` when the payload is absent or does not look like a command.
    pub fn into_command_data(self) -> Option<CommandData> {
        serde_json::from_value(self.data?).ok()
    }
}

/// Application command payload.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CommandData {
    /// Platform identifier of the invoked command.
    #[serde(default)]
    pub id: String,
    /// Name of the invoked command.
    #[serde(default)]
    pub name: String,
    /// Command options, kept opaque.
    #[serde(default)]
    pub options: Vec<serde_json::Value>,
}

/// Response written back to Discord.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InteractionResponse {
    /// Response type discriminant.
    #[serde(rename = "type")]
    pub kind: u8,
    /// Message content, absent for pongs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl InteractionResponse {
    /// Handshake answer to a ping interaction.
    pub fn pong() -> Self {
        InteractionResponse {
            kind: RESPONSE_PONG,
            data: None,
        }
    }

    /// Channel message answering the invoked command.
    pub fn message(data: ResponseData) -> Self {
        InteractionResponse {
            kind: RESPONSE_CHANNEL_MESSAGE_WITH_SOURCE,
            data: Some(data),
        }
    }

    /// Plain-text channel message.
    pub fn text(content: &str) -> Self {
        Self::message(ResponseData::text(content))
    }
}

/// Message body of an interaction response.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

impl ResponseData {
    /// Message with text content only.
    pub fn text(content: &str) -> Self {
        ResponseData {
            content: Some(content.to_owned()),
            embeds: vec![],
        }
    }
}

/// Rich message layout.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Embed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
}

/// One named block of an embed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

/// Small image shown in the corner of an embed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub url: String,
}
