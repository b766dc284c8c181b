use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::hotkey_machine::HotkeyInteractionState;

/// Modifier held together with the key of a [`ClickCombination`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    /// Key alone.
    #[default]
    None,
    /// With Alt.
    Alt,
    /// With Shift.
    Shift,
    /// With Ctrl.
    Ctrl,
}

/// A key chord, e.g. `Alt+Q`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct ClickCombination {
    /// Modifier held with the key.
    #[serde(default)]
    pub modifier: Modifier,
    /// Key name.
    pub key: String,
}

impl fmt::Display for ClickCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.modifier {
            Modifier::None => write!(f, "{}", self.key),
            Modifier::Alt => write!(f, "Alt+{}", self.key),
            Modifier::Shift => write!(f, "Shift+{}", self.key),
            Modifier::Ctrl => write!(f, "Ctrl+{}", self.key),
        }
    }
}

/// A remapped item hotkey: pressing `combo` uses the item in `item_slot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HotKey {
    /// Chord that triggers the item.
    pub combo: ClickCombination,
    /// Inventory slot, 1 to 6.
    pub item_slot: u8,
    /// Label shown in the settings screen.
    #[serde(default)]
    pub ui_display: String,
}

/// Hotkey sub-state of the store.
#[derive(Debug, Clone, Default)]
pub struct HotkeyModuleState {
    hot_keys: IndexMap<ClickCombination, HotKey>,
    /// Current interaction state.
    pub machine: HotkeyInteractionState,
    /// Last port the game client listened on.
    pub last_w3c_port: String,
    /// Chord the host maps to the toggle input.
    pub toggle_combo: Option<ClickCombination>,
}

impl HotkeyModuleState {
    /// Registered hotkeys in insertion order.
    pub fn hot_keys(&self) -> Vec<HotKey> {
        self.hot_keys.values().cloned().collect()
    }

    /// Replace the whole list. Later duplicates of a combination win.
    pub fn set_hot_keys(&mut self, hot_keys: Vec<HotKey>) {
        self.hot_keys = hot_keys
            .into_iter()
            .map(|hot_key| (hot_key.combo.clone(), hot_key))
            .collect();
    }

    /// List obtained by dropping any binding on the same combination and
    /// appending `hot_key`.
    pub fn with_hot_key(&self, hot_key: HotKey) -> Vec<HotKey> {
        let mut next = self.hot_keys.clone();
        next.shift_remove(&hot_key.combo);
        next.insert(hot_key.combo.clone(), hot_key);
        next.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hot_key(modifier: Modifier, key: &str, item_slot: u8) -> HotKey {
        HotKey {
            combo: ClickCombination {
                modifier,
                key: key.into(),
            },
            item_slot,
            ui_display: String::new(),
        }
    }

    #[test]
    fn rebinding_a_combination_moves_it_last() {
        let mut state = HotkeyModuleState::default();
        state.set_hot_keys(vec![
            hot_key(Modifier::Alt, "Q", 1),
            hot_key(Modifier::Alt, "W", 2),
        ]);

        let next = state.with_hot_key(hot_key(Modifier::Alt, "Q", 5));
        let slots: Vec<_> = next.iter().map(|h| (h.combo.key.as_str(), h.item_slot)).collect();
        assert_eq!(slots, vec![("W", 2), ("Q", 5)]);
    }

    #[test]
    fn same_key_with_other_modifier_is_a_distinct_binding() {
        let state = HotkeyModuleState::default();
        let mut state_with_one = state.clone();
        state_with_one.set_hot_keys(state.with_hot_key(hot_key(Modifier::Alt, "Q", 1)));

        let next = state_with_one.with_hot_key(hot_key(Modifier::Ctrl, "Q", 2));
        assert_eq!(next.len(), 2);
    }

    #[test]
    fn combination_display() {
        assert_eq!(hot_key(Modifier::Shift, "E", 1).combo.to_string(), "Shift+E");
        assert_eq!(hot_key(Modifier::None, "F1", 1).combo.to_string(), "F1");
    }
}
