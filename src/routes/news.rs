use axum::{
    Json, Router,
    extract::State,
    routing::get,
};

use crate::{
    services::session_service,
    state::{SharedState, session::News},
};

/// News feed of the selected endpoint.
pub fn router() -> Router<SharedState> {
    Router::new().route("/news", get(get_news).post(reload_news))
}

#[utoipa::path(
    get,
    path = "/news",
    tag = "session",
    responses((status = 200, description = "Last loaded news", body = [News]))
)]
/// Return the news loaded last.
pub async fn get_news(State(state): State<SharedState>) -> Json<Vec<News>> {
    Json(state.root().read().await.news.clone())
}

/// Fetch the news again; an unreachable feed yields an empty list.
#[utoipa::path(
    post,
    path = "/news",
    tag = "session",
    responses((status = 200, description = "Reloaded news", body = [News]))
)]
pub async fn reload_news(State(state): State<SharedState>) -> Json<Vec<News>> {
    Json(session_service::load_news(&state).await)
}
