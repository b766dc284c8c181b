use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::hotkeys::{ClickCombinationInput, HotKeyInput, HotkeyInputRequest, HotkeysSummary, PortRequest},
    error::AppError,
    services::hotkey_service,
    state::{SharedState, hotkeys::HotKey},
};

/// Item hotkey bindings and the in-game interaction state.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/hotkeys", get(get_hotkeys).post(add_hot_key))
        .route("/hotkeys/toggle-combo", post(set_toggle_combo))
        .route("/hotkeys/toggle", post(toggle_hot_keys))
        .route("/hotkeys/enable", post(enable_hot_keys))
        .route("/hotkeys/disable", post(disable_hot_keys))
        .route("/hotkeys/input", post(apply_input))
        .route("/hotkeys/game/enter", post(enter_game))
        .route("/hotkeys/game/exit", post(exit_game))
        .route("/hotkeys/port", post(save_last_w3c_port))
}

#[utoipa::path(
    get,
    path = "/hotkeys",
    tag = "hotkeys",
    responses((status = 200, description = "Hotkey state", body = HotkeysSummary))
)]
/// Return the hotkey sub-state.
pub async fn get_hotkeys(State(state): State<SharedState>) -> Json<HotkeysSummary> {
    Json(hotkey_service::hotkeys_summary(&state).await)
}

/// Bind a key chord to an inventory slot, replacing any binding of the same chord.
#[utoipa::path(
    post,
    path = "/hotkeys",
    tag = "hotkeys",
    request_body = HotKeyInput,
    responses(
        (status = 200, description = "Bindings after the change", body = [HotKey]),
        (status = 400, description = "Invalid binding")
    )
)]
pub async fn add_hot_key(
    State(state): State<SharedState>,
    Json(payload): Json<HotKeyInput>,
) -> Result<Json<Vec<HotKey>>, AppError> {
    payload.validate()?;
    Ok(Json(hotkey_service::add_hot_key(&state, payload.into()).await))
}

#[utoipa::path(
    post,
    path = "/hotkeys/toggle-combo",
    tag = "hotkeys",
    request_body = ClickCombinationInput,
    responses(
        (status = 204, description = "Toggle chord registered"),
        (status = 400, description = "Invalid chord")
    )
)]
/// Choose the chord that toggles forwarding.
pub async fn set_toggle_combo(
    State(state): State<SharedState>,
    Json(payload): Json<ClickCombinationInput>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;
    hotkey_service::set_toggle_combo(&state, payload.into()).await;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/hotkeys/toggle",
    tag = "hotkeys",
    responses((status = 200, description = "Hotkey state", body = HotkeysSummary))
)]
/// Flip forwarding on or off.
pub async fn toggle_hot_keys(State(state): State<SharedState>) -> Json<HotkeysSummary> {
    hotkey_service::toggle_hot_keys(&state).await;
    Json(hotkey_service::hotkeys_summary(&state).await)
}

#[utoipa::path(
    post,
    path = "/hotkeys/enable",
    tag = "hotkeys",
    responses((status = 204, description = "Hotkeys forwarded"))
)]
/// Force forwarding on.
pub async fn enable_hot_keys(State(state): State<SharedState>) -> StatusCode {
    hotkey_service::enable_hot_keys(&state);
    StatusCode::NO_CONTENT
}

#[utoipa::path(
    post,
    path = "/hotkeys/disable",
    tag = "hotkeys",
    responses((status = 204, description = "Hotkeys no longer forwarded"))
)]
/// Force forwarding off.
pub async fn disable_hot_keys(State(state): State<SharedState>) -> StatusCode {
    hotkey_service::disable_hot_keys(&state);
    StatusCode::NO_CONTENT
}

/// Feed a key press or game lifecycle event to the interaction state machine.
#[utoipa::path(
    post,
    path = "/hotkeys/input",
    tag = "hotkeys",
    request_body = HotkeyInputRequest,
    responses((status = 200, description = "Hotkey state", body = HotkeysSummary))
)]
pub async fn apply_input(
    State(state): State<SharedState>,
    Json(payload): Json<HotkeyInputRequest>,
) -> Json<HotkeysSummary> {
    hotkey_service::apply_input(&state, payload.input).await;
    Json(hotkey_service::hotkeys_summary(&state).await)
}

#[utoipa::path(
    post,
    path = "/hotkeys/game/enter",
    tag = "hotkeys",
    responses((status = 200, description = "Hotkey state", body = HotkeysSummary))
)]
/// A game started.
pub async fn enter_game(State(state): State<SharedState>) -> Json<HotkeysSummary> {
    hotkey_service::enter_game(&state).await;
    Json(hotkey_service::hotkeys_summary(&state).await)
}

#[utoipa::path(
    post,
    path = "/hotkeys/game/exit",
    tag = "hotkeys",
    responses((status = 200, description = "Hotkey state", body = HotkeysSummary))
)]
/// The game ended.
pub async fn exit_game(State(state): State<SharedState>) -> Json<HotkeysSummary> {
    hotkey_service::exit_game(&state).await;
    Json(hotkey_service::hotkeys_summary(&state).await)
}

#[utoipa::path(
    post,
    path = "/hotkeys/port",
    tag = "hotkeys",
    request_body = PortRequest,
    responses(
        (status = 204, description = "Port saved"),
        (status = 400, description = "Invalid port")
    )
)]
/// Remember the port the game client listens on.
pub async fn save_last_w3c_port(
    State(state): State<SharedState>,
    Json(payload): Json<PortRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;
    hotkey_service::save_last_w3c_port(&state, payload.port).await;
    Ok(StatusCode::NO_CONTENT)
}
