use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{
    services::sse_service::{self, StreamKind},
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/sse/ui",
    tag = "sse",
    responses((status = 200, description = "Renderer state notifications", content_type = "text/event-stream", body = String))
)]
/// Stream state change notifications to the renderer.
pub async fn ui_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let receiver = state.ui_sse().subscribe();
    info!("New UI SSE connection");
    sse_service::broadcast_info(state.ui_sse(), "ui stream connected");
    sse_service::to_sse_stream(receiver, StreamKind::Ui)
}

#[utoipa::path(
    get,
    path = "/sse/host",
    tag = "sse",
    responses((status = 200, description = "Requests for the host process", content_type = "text/event-stream", body = String))
)]
/// Stream update checks and login window requests to the host process.
pub async fn host_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let receiver = state.host_sse().subscribe();
    info!("New host SSE connection");
    sse_service::to_sse_stream(receiver, StreamKind::Host)
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/sse/ui", get(ui_stream))
        .route("/sse/host", get(host_stream))
}
