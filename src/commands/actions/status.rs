//! Status command handler.
//!
//! Fetches every world and lists, grouped by data center:
//! - worlds under maintenance
//! - worlds where new characters cannot be created

use log::{debug, error};

use crate::{
    commands::{
        Presentation,
        embed_response::{FETCH_FAILED, format_status},
    },
    discord::{InteractionResponse, ResponseData},
    ffxiv::WorldsSource,
};

/// Fetches the worlds and formats the flagged ones.
///
/// A fetch failure is logged and answered with an apology.
pub async fn handle_status(
    source: &dyn WorldsSource,
    presentation: &Presentation,
) -> InteractionResponse {
    debug!("handling status command");

    let data = match source.get_worlds().await {
        Ok(response) => format_status(&response.worlds, presentation),
        Err(e) => {
            error!("cannot fetch worlds: {}", e);
            ResponseData::text(FETCH_FAILED)
        }
    };

    InteractionResponse::message(data)
}
