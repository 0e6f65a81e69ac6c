use axum::Router;

use crate::state::SharedState;

/// Identity extractors and the admin guard.
pub mod auth;
/// Swagger UI and OpenAPI document.
pub mod docs;
/// Explainer actions.
pub mod game;
/// Health check.
pub mod health;
/// Room lifecycle and tickets.
pub mod rooms;
/// Room observer sockets.
pub mod websocket;
/// Word catalog management.
pub mod words;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(rooms::router())
        .merge(game::router())
        .merge(words::router(state.clone()))
        .merge(websocket::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
