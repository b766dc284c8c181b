use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    config::Endpoint,
    state::{
        hotkey_machine::HotkeyInteractionState,
        hotkeys::{ClickCombination, HotKey},
        session::{LoginGateway, News},
        status::GameStatusSnapshot,
    },
};

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    /// SSE event name.
    pub event: Option<String>,
    /// Serialized payload.
    pub data: String,
}

impl ServerEvent {
    /// Build an event with a raw data payload.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast whenever the live game status snapshot changes.
pub struct StatusChangedEvent {
    /// New snapshot, `null` after logout.
    pub status: Option<GameStatusSnapshot>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast whenever the hotkey interaction state or bindings change.
pub struct HotkeysChangedEvent {
    /// Current interaction state.
    pub state: HotkeyInteractionState,
    /// Whether bindings are forwarded right now.
    pub hotkeys_active: bool,
    /// Bindings in insertion order.
    pub hot_keys: Vec<HotKey>,
    /// Chord that sends the toggle input.
    pub toggle_combo: Option<ClickCombination>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the login changes.
pub struct SessionChangedEvent {
    /// Logged in player, `null` after logout.
    pub battle_tag: Option<String>,
    /// Gateway selected on the login screen.
    pub gateway: LoginGateway,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the backend endpoint selection completes.
pub struct EndpointChangedEvent {
    /// Newly selected endpoint.
    pub endpoint: Endpoint,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast after the news list was (re)loaded.
pub struct NewsChangedEvent {
    /// Loaded entries.
    pub news: Vec<News>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Request sent to the host process to start the OAuth flow.
pub struct OAuthRequestedEvent {
    /// Gateway to log in on.
    pub gateway: LoginGateway,
}
