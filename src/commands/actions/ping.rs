//! Ping command handler.

use log::debug;

use crate::{commands::embed_response::PONG, discord::InteractionResponse};

/// Answers `Pong.` without calling the status API.
pub fn handle_ping() -> InteractionResponse {
    debug!("handling ping command");

    InteractionResponse::text(PONG)
}
