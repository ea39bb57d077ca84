//! Interaction endpoint and middlewares.

use std::time::Instant;

use axum::{
    Json,
    body::{Body, Bytes, to_bytes},
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use log::{debug, error, info, warn};

use crate::{
    discord::{Interaction, InteractionResponse, InteractionType},
    server::AppState,
};

/// Largest accepted interaction payload.
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Rejects requests without a valid Discord signature with `401`.
///
/// The body is buffered to be verified, then handed to the next layer.
pub async fn require_signature(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();

    let bytes = match to_bytes(body, MAX_BODY_SIZE).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("cannot read request body: {}", e);
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
    };

    if !state.verifier.is_authorized(&parts.headers, &bytes) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

/// Logs method, path, status and latency of every request.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        "{} {} -> {} in {:?}",
        method,
        path,
        response.status().as_u16(),
        start.elapsed()
    );

    response
}

/// `POST /interactions`
///
/// - ping → `{"type": 1}`
/// - application command → dispatched to the [`Commander`](crate::commands::Commander)
/// - malformed JSON → `500` with an empty body
/// - anything else → `400` with an empty body
pub async fn handle_interaction(State(state): State<AppState>, body: Bytes) -> Response {
    let interaction: Interaction = match serde_json::from_slice(&body) {
        Ok(interaction) => interaction,
        Err(e) => {
            error!("cannot decode interaction: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match interaction.interaction_type() {
        InteractionType::Ping => {
            debug!("answering ping");
            Json(InteractionResponse::pong()).into_response()
        }
        InteractionType::ApplicationCommand => {
            let Some(data) = interaction.into_command_data() else {
                warn!("application command without valid data");
                return StatusCode::BAD_REQUEST.into_response();
            };

            match state.commander.dispatch(&data).await {
                Ok(response) => Json(response).into_response(),
                Err(problem) => problem.into_response(),
            }
        }
        InteractionType::Unsupported(kind) => {
            warn!("unsupported interaction type {}", kind);
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}
