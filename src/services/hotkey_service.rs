use tracing::{debug, warn};

use crate::{
    dto::hotkeys::HotkeysSummary,
    services::sse_events::broadcast_hotkeys_changed,
    state::{
        SharedState,
        hotkey_machine::{HotkeyInput, HotkeyInteractionState},
        hotkeys::{ClickCombination, HotKey},
    },
};

/// Bind `hot_key`, replacing any binding on the same combination, and persist the list.
pub async fn add_hot_key(state: &SharedState, hot_key: HotKey) -> Vec<HotKey> {
    let registry = &state.services().hotkeys;
    let mut hotkeys = state.hotkeys().write().await;

    let next = hotkeys.with_hot_key(hot_key.clone());
    registry.register_key(&hot_key);
    if let Err(err) = registry.save_hot_keys(next.clone()).await {
        warn!(error = %err, combo = %hot_key.combo, "failed to persist hotkeys");
    }
    hotkeys.set_hot_keys(next);

    broadcast_hotkeys_changed(state, &hotkeys);
    hotkeys.hot_keys()
}

/// Bind the combination that switches hotkeys on and off.
pub async fn set_toggle_combo(state: &SharedState, combo: ClickCombination) {
    state.services().hotkeys.toggle_on_off(&combo);
    let mut hotkeys = state.hotkeys().write().await;
    hotkeys.toggle_combo = Some(combo);
    broadcast_hotkeys_changed(state, &hotkeys);
}

/// Turn forwarding on in the registration service, leaving the machine untouched.
pub fn enable_hot_keys(state: &SharedState) {
    state.services().hotkeys.enable_hot_keys();
}

/// Counterpart of [`enable_hot_keys`].
pub fn disable_hot_keys(state: &SharedState) {
    state.services().hotkeys.disable_hot_keys();
}

/// Restore persisted bindings.
pub async fn load_hot_keys(state: &SharedState) -> Vec<HotKey> {
    let loaded = state.services().hotkeys.load_hot_keys();
    let mut hotkeys = state.hotkeys().write().await;
    hotkeys.set_hot_keys(loaded);
    broadcast_hotkeys_changed(state, &hotkeys);
    hotkeys.hot_keys()
}

/// Persist and remember the game client port. A failed write is logged only.
pub async fn save_last_w3c_port(state: &SharedState, port: String) {
    if let Err(err) = state.services().hotkeys.save_last_w3c_port(port.clone()).await {
        warn!(error = %err, %port, "failed to persist game port");
    }
    state.hotkeys().write().await.last_w3c_port = port;
}

/// Restore the persisted game client port.
pub async fn load_last_w3c_port(state: &SharedState) -> String {
    let port = state.services().hotkeys.load_last_w3c_port();
    state.hotkeys().write().await.last_w3c_port = port.clone();
    port
}

/// A game started.
pub async fn enter_game(state: &SharedState) -> HotkeyInteractionState {
    apply_input(state, HotkeyInput::EnterGame).await
}

/// The game ended.
pub async fn exit_game(state: &SharedState) -> HotkeyInteractionState {
    apply_input(state, HotkeyInput::ExitGame).await
}

/// Flip between forwarding and suspended.
pub async fn toggle_hot_keys(state: &SharedState) -> HotkeyInteractionState {
    apply_input(state, HotkeyInput::Toggle).await
}

/// Feed one input to the hotkey state machine.
///
/// The registration service is enabled or disabled whenever the transition changes
/// whether hotkeys are forwarded.
pub async fn apply_input(state: &SharedState, input: HotkeyInput) -> HotkeyInteractionState {
    let mut hotkeys = state.hotkeys().write().await;
    let previous = hotkeys.machine;
    let next = previous.apply(input);

    if previous == next {
        debug!(?input, state = ?previous, "hotkey input ignored");
        return next;
    }

    hotkeys.machine = next;
    match (previous.hotkeys_active(), next.hotkeys_active()) {
        (false, true) => state.services().hotkeys.enable_hot_keys(),
        (true, false) => state.services().hotkeys.disable_hot_keys(),
        _ => {}
    }

    debug!(?input, from = ?previous, to = ?next, "hotkey state changed");
    broadcast_hotkeys_changed(state, &hotkeys);
    next
}

/// Snapshot for the renderer.
pub async fn hotkeys_summary(state: &SharedState) -> HotkeysSummary {
    let hotkeys = state.hotkeys().read().await;
    HotkeysSummary {
        state: hotkeys.machine,
        hotkeys_active: hotkeys.machine.hotkeys_active(),
        hot_keys: hotkeys.hot_keys(),
        last_w3c_port: hotkeys.last_w3c_port.clone(),
        toggle_combo: hotkeys.toggle_combo.clone(),
    }
}
