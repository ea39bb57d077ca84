//! Interaction HTTP server.
//!
//! Discord delivers interactions by POSTing them to `/interactions`. Every
//! request goes through:
//!
//! ```text
//! log_requests → timeout → require_signature → handle_interaction
//! ```
//!
//! # Modules
//!
//! - `handlers` - Endpoint and middlewares
//! - `problem` - RFC 7807 problem documents

use std::{sync::Arc, time::Duration};

mod handlers;
mod problem;

use axum::{Router, http::StatusCode, middleware, routing::post};
use tower_http::timeout::TimeoutLayer;

use crate::{commands::Commander, discord::RequestVerifier};
use crate::server::handlers::{handle_interaction, log_requests, require_signature};
pub use crate::server::problem::ErrorResponse;

/// Shared, read-only state of the request handlers.
#[derive(Clone)]
pub struct AppState {
    pub commander: Arc<Commander>,
    pub verifier: Arc<RequestVerifier>,
}

/// Builds the interaction router.
///
/// # Arguments
///
/// * `state` - Dispatcher and signature verifier
/// * `timeout` - Maximum time to answer a request, `408` afterwards
pub fn create_router(state: AppState, timeout: Duration) -> Router {
    Router::new()
        .route("/interactions", post(handle_interaction))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_signature,
        ))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}
