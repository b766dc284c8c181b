use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::validation::{validate_key_name, validate_port},
    state::{
        hotkey_machine::{HotkeyInput, HotkeyInteractionState},
        hotkeys::{ClickCombination, HotKey, Modifier},
    },
};

/// Key chord supplied by the settings screen.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ClickCombinationInput {
    /// Modifier held with the key.
    #[serde(default)]
    pub modifier: Modifier,
    /// Key name, e.g. `Q` or `Numpad7`.
    #[validate(custom(function = validate_key_name))]
    pub key: String,
}

impl From<ClickCombinationInput> for ClickCombination {
    fn from(value: ClickCombinationInput) -> Self {
        Self {
            modifier: value.modifier,
            key: value.key.trim().to_string(),
        }
    }
}

/// Payload binding a key chord to an inventory slot.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct HotKeyInput {
    /// Chord to bind.
    #[validate(nested)]
    pub combo: ClickCombinationInput,
    /// Inventory slot, 1 to 6.
    #[validate(range(min = 1, max = 6))]
    pub item_slot: u8,
    /// Label for the settings screen; defaults to the chord.
    #[serde(default)]
    #[validate(length(max = 32))]
    pub ui_display: String,
}

impl From<HotKeyInput> for HotKey {
    fn from(value: HotKeyInput) -> Self {
        let combo: ClickCombination = value.combo.into();
        let ui_display = if value.ui_display.trim().is_empty() {
            combo.to_string()
        } else {
            value.ui_display
        };
        Self {
            combo,
            item_slot: value.item_slot,
            ui_display,
        }
    }
}

/// Input forwarded by the host's key hook or game watcher.
#[derive(Debug, Deserialize, ToSchema)]
pub struct HotkeyInputRequest {
    /// Input to apply.
    pub input: HotkeyInput,
}

/// Game client port to remember.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PortRequest {
    /// Port as a decimal string.
    #[validate(custom(function = validate_port))]
    pub port: String,
}

/// Hotkey sub-state exposed to the renderer.
#[derive(Debug, Serialize, ToSchema)]
pub struct HotkeysSummary {
    /// Current interaction state.
    pub state: HotkeyInteractionState,
    /// Whether bindings are forwarded right now.
    pub hotkeys_active: bool,
    /// Bindings in insertion order.
    pub hot_keys: Vec<HotKey>,
    /// Last port the game client listened on.
    pub last_w3c_port: String,
    /// Chord that sends the toggle input, once one was set.
    pub toggle_combo: Option<ClickCombination>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(key: &str, item_slot: u8) -> HotKeyInput {
        HotKeyInput {
            combo: ClickCombinationInput {
                modifier: Modifier::Alt,
                key: key.into(),
            },
            item_slot,
            ui_display: String::new(),
        }
    }

    #[test]
    fn item_slot_must_be_in_inventory() {
        assert!(input("Q", 1).validate().is_ok());
        assert!(input("Q", 6).validate().is_ok());
        assert!(input("Q", 0).validate().is_err());
        assert!(input("Q", 7).validate().is_err());
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(input(" ", 1).validate().is_err());
    }

    #[test]
    fn missing_label_defaults_to_combination() {
        let hot_key: HotKey = input("Q", 2).into();
        assert_eq!(hot_key.ui_display, "Alt+Q");
    }
}
