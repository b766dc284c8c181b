use axum::Router;

use crate::state::SharedState;

/// Swagger UI.
pub mod docs;
/// Health check.
pub mod health;
/// Hotkey bindings and interaction state.
pub mod hotkeys;
/// News feed.
pub mod news;
/// Environment and login.
pub mod session;
/// SSE streams.
pub mod sse;
/// Live game status and the worker socket.
pub mod status;
/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(session::router())
        .merge(news::router())
        .merge(hotkeys::router())
        .merge(status::router())
        .merge(sse::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
