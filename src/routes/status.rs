use axum::{
    Json, Router,
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
};

use crate::{
    services::{status_service, websocket_service},
    state::{SharedState, status::GameStatusSnapshot},
};

/// Live game status and the worker socket feeding it.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/status", get(get_status))
        .route("/ws/status", get(status_socket))
}

#[utoipa::path(
    get,
    path = "/status",
    tag = "status",
    responses((status = 200, description = "Current game status, null when unknown", body = GameStatusSnapshot))
)]
/// Return the current game status snapshot.
pub async fn get_status(State(state): State<SharedState>) -> Json<Option<GameStatusSnapshot>> {
    Json(status_service::current_status(&state).await)
}

#[utoipa::path(
    get,
    path = "/ws/status",
    tag = "status",
    responses((status = 101, description = "Switching protocols to WebSocket"))
)]
/// Upgrade the connection of the game-integration worker.
pub async fn status_socket(
    State(state): State<SharedState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| websocket_service::handle_status_socket(state, socket))
}
