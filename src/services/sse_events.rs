use serde::Serialize;
use tracing::warn;

use crate::{
    config::Endpoint,
    dto::sse::{
        EndpointChangedEvent, HotkeysChangedEvent, NewsChangedEvent, ServerEvent,
        SessionChangedEvent, StatusChangedEvent,
    },
    state::{
        SharedState,
        hotkeys::HotkeyModuleState,
        session::{LoginGateway, News, W3cToken},
        status::GameStatusSnapshot,
    },
};

const EVENT_STATUS_CHANGED: &str = "status.changed";
const EVENT_HOTKEYS_CHANGED: &str = "hotkeys.changed";
const EVENT_SESSION_CHANGED: &str = "session.changed";
const EVENT_ENDPOINT_CHANGED: &str = "endpoint.changed";
const EVENT_NEWS_CHANGED: &str = "news.changed";

/// Broadcast the live game status after a reducer step.
pub fn broadcast_status_changed(state: &SharedState, status: Option<&GameStatusSnapshot>) {
    let payload = StatusChangedEvent {
        status: status.cloned(),
    };
    send_ui_event(state, EVENT_STATUS_CHANGED, &payload);
}

/// Broadcast the hotkey interaction state and bindings.
pub fn broadcast_hotkeys_changed(state: &SharedState, hotkeys: &HotkeyModuleState) {
    let payload = HotkeysChangedEvent {
        state: hotkeys.machine,
        hotkeys_active: hotkeys.machine.hotkeys_active(),
        hot_keys: hotkeys.hot_keys(),
        toggle_combo: hotkeys.toggle_combo.clone(),
    };
    send_ui_event(state, EVENT_HOTKEYS_CHANGED, &payload);
}

/// Broadcast a login or logout.
pub fn broadcast_session_changed(
    state: &SharedState,
    token: Option<&W3cToken>,
    gateway: LoginGateway,
) {
    let payload = SessionChangedEvent {
        battle_tag: token.map(|token| token.battle_tag.clone()),
        gateway,
    };
    send_ui_event(state, EVENT_SESSION_CHANGED, &payload);
}

/// Notify the renderer that init picked an endpoint.
pub fn broadcast_endpoint_changed(state: &SharedState, endpoint: &Endpoint) {
    let payload = EndpointChangedEvent {
        endpoint: endpoint.clone(),
    };
    send_ui_event(state, EVENT_ENDPOINT_CHANGED, &payload);
}

/// Notify the renderer of reloaded news.
pub fn broadcast_news_changed(state: &SharedState, news: &[News]) {
    let payload = NewsChangedEvent {
        news: news.to_vec(),
    };
    send_ui_event(state, EVENT_NEWS_CHANGED, &payload);
}

fn send_ui_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => {
            state.ui_sse().broadcast(event);
        }
        Err(err) => warn!(event, error = %err, "failed to serialize UI SSE payload"),
    }
}
