use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use validator::Validate;

use crate::{
    config::Endpoint,
    dto::session::{
        AuthorizeRequest, LoginGatewayRequest, ModeRequest, ResetAuthenticationRequest,
        SessionSummary,
    },
    error::AppError,
    services::session_service,
    state::{SharedState, session::W3cToken},
};

/// Environment and login endpoints used by the renderer.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/session", get(get_session))
        .route("/session/init", post(init))
        .route("/session/test-mode", post(set_test_mode))
        .route("/session/china-proxy", post(set_china_proxy))
        .route("/session/gateway", post(set_login_gateway))
        .route("/session/authorize", post(authorize))
        .route("/session/reset", post(reset_authentication))
}

/// Current environment, endpoint and login.
#[utoipa::path(
    get,
    path = "/session",
    tag = "session",
    responses((status = 200, description = "Session state", body = SessionSummary))
)]
pub async fn get_session(State(state): State<SharedState>) -> Json<SessionSummary> {
    Json(session_service::session_summary(&state).await)
}

/// Select the fastest endpoint and run the update check.
#[utoipa::path(
    post,
    path = "/session/init",
    tag = "session",
    responses(
        (status = 200, description = "Endpoint selected", body = Endpoint),
        (status = 503, description = "No endpoint could be selected")
    )
)]
pub async fn init(State(state): State<SharedState>) -> Result<Json<Endpoint>, AppError> {
    Ok(Json(session_service::init(&state).await?))
}

#[utoipa::path(
    post,
    path = "/session/test-mode",
    tag = "session",
    request_body = ModeRequest,
    responses((status = 200, description = "Mode switched", body = SessionSummary))
)]
/// Switch between the production and test environments, then re-run init.
pub async fn set_test_mode(
    State(state): State<SharedState>,
    Json(payload): Json<ModeRequest>,
) -> Json<SessionSummary> {
    session_service::set_test_mode(&state, payload.enabled).await;
    Json(session_service::session_summary(&state).await)
}

#[utoipa::path(
    post,
    path = "/session/china-proxy",
    tag = "session",
    request_body = ModeRequest,
    responses((status = 200, description = "Proxy switched", body = SessionSummary))
)]
/// Enable or disable the China proxy.
pub async fn set_china_proxy(
    State(state): State<SharedState>,
    Json(payload): Json<ModeRequest>,
) -> Json<SessionSummary> {
    session_service::set_china_proxy(&state, payload.enabled).await;
    Json(session_service::session_summary(&state).await)
}

#[utoipa::path(
    post,
    path = "/session/gateway",
    tag = "session",
    request_body = LoginGatewayRequest,
    responses((status = 204, description = "Gateway selected"))
)]
/// Select the gateway for the next login.
pub async fn set_login_gateway(
    State(state): State<SharedState>,
    Json(payload): Json<LoginGatewayRequest>,
) -> StatusCode {
    session_service::set_login_gateway(&state, payload.gateway).await;
    StatusCode::NO_CONTENT
}

/// Exchange an OAuth code for a W3Champions token.
#[utoipa::path(
    post,
    path = "/session/authorize",
    tag = "session",
    request_body = AuthorizeRequest,
    responses(
        (status = 200, description = "Logged in", body = W3cToken),
        (status = 400, description = "Invalid code"),
        (status = 401, description = "Authorization refused")
    )
)]
pub async fn authorize(
    State(state): State<SharedState>,
    Json(payload): Json<AuthorizeRequest>,
) -> Result<Json<W3cToken>, AppError> {
    payload.validate()?;
    session_service::authorize_with_code(&state, payload.code)
        .await
        .map(Json)
        .ok_or_else(|| AppError::Unauthorized("authorization refused".into()))
}

/// Log out, optionally asking the host to show the login window again.
#[utoipa::path(
    post,
    path = "/session/reset",
    tag = "session",
    request_body = ResetAuthenticationRequest,
    responses((status = 204, description = "Logged out"))
)]
pub async fn reset_authentication(
    State(state): State<SharedState>,
    payload: Option<Json<ResetAuthenticationRequest>>,
) -> StatusCode {
    let payload = payload.map(|Json(payload)| payload).unwrap_or_default();
    session_service::reset_authentication(&state, payload.request_relogin).await;
    StatusCode::NO_CONTENT
}
