//! Characters command handler.
//!
//! Lists the worlds where new characters cannot be created, grouped by data center.

use log::{debug, error};

use crate::{
    commands::{
        Presentation,
        embed_response::{FETCH_FAILED, format_character_creation},
    },
    discord::{InteractionResponse, ResponseData},
    ffxiv::WorldsSource,
};

/// Fetches the worlds and formats those closed to new characters.
pub async fn handle_characters(
    source: &dyn WorldsSource,
    presentation: &Presentation,
) -> InteractionResponse {
    debug!("handling characters command");

    let data = match source.get_worlds().await {
        Ok(response) => format_character_creation(&response.worlds, presentation),
        Err(e) => {
            error!("cannot fetch worlds: {}", e);
            ResponseData::text(FETCH_FAILED)
        }
    };

    InteractionResponse::message(data)
}
