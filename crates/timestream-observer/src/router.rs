//! Axum router construction for the Observer API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /health` -- liveness and world size
/// - `GET /events` -- loaded events
/// - `GET /personas` -- persona summaries
/// - `GET /personas/{id}` -- single persona
/// - `GET /posts` -- recent accepted posts
/// - `GET /settings`, `POST /settings` -- runtime settings
/// - `GET /ws/stream` -- `WebSocket` post stream
///
/// CORS allows any origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/events", get(handlers::list_events))
        .route("/personas", get(handlers::list_personas))
        .route("/personas/{id}", get(handlers::get_persona))
        .route("/posts", get(handlers::recent_posts))
        .route(
            "/settings",
            get(handlers::get_settings).post(handlers::update_settings),
        )
        .route("/ws/stream", get(ws::ws_stream))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
