use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Where the user currently is from the point of view of hotkey handling.
///
/// Hotkeys are only forwarded while [`HotkeyInteractionState::InGame`]; every other
/// state either means the game is not running or the keyboard is busy with
/// something else (chat, menus, manual override).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HotkeyInteractionState {
    /// The game client is not running a match.
    #[default]
    NotInGame,
    /// In a match with hotkeys live.
    InGame,
    /// Enter opened the chat box; keys belong to the text input.
    Chat,
    /// F10 opened the in-game menu.
    GameMenu,
    /// F12 opened the message log.
    MessageLog,
    /// The user switched hotkeys off with the toggle combination.
    Disabled,
}

/// Inputs that drive [`HotkeyInteractionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HotkeyInput {
    /// The host reported that a match started.
    EnterGame,
    /// The host reported that the match ended.
    ExitGame,
    /// Enter key.
    Enter,
    /// Escape key.
    Escape,
    /// F10 key.
    F10,
    /// F12 key.
    F12,
    /// Toggle combination registered by the user.
    Toggle,
}

impl HotkeyInteractionState {
    /// Whether registered item hotkeys should be forwarded in this state.
    pub fn hotkeys_active(self) -> bool {
        matches!(self, Self::InGame)
    }

    /// Dispatch a single input to the matching transition.
    pub fn apply(self, input: HotkeyInput) -> Self {
        match input {
            HotkeyInput::EnterGame => self.enter_game(),
            HotkeyInput::ExitGame => self.exit_game(),
            HotkeyInput::Enter => self.press_enter(),
            HotkeyInput::Escape => self.press_escape(),
            HotkeyInput::F10 => self.press_f10(),
            HotkeyInput::F12 => self.press_f12(),
            HotkeyInput::Toggle => self.toggle(),
        }
    }

    /// A match started. Only leaves [`Self::NotInGame`].
    pub fn enter_game(self) -> Self {
        match self {
            Self::NotInGame => Self::InGame,
            other => other,
        }
    }

    /// The match ended, whatever the keyboard was doing.
    pub fn exit_game(self) -> Self {
        match self {
            Self::NotInGame => self,
            _ => Self::NotInGame,
        }
    }

    /// Enter opens the chat in game and sends it from the chat.
    pub fn press_enter(self) -> Self {
        match self {
            Self::InGame => Self::Chat,
            // Enter sends the chat message.
            Self::Chat => Self::InGame,
            other => other,
        }
    }

    /// Escape closes the chat, the menu or the log.
    pub fn press_escape(self) -> Self {
        match self {
            Self::Chat | Self::GameMenu | Self::MessageLog => Self::InGame,
            other => other,
        }
    }

    /// F10 opens or closes the game menu.
    pub fn press_f10(self) -> Self {
        match self {
            Self::InGame => Self::GameMenu,
            Self::GameMenu => Self::InGame,
            other => other,
        }
    }

    /// F12 opens or closes the message log.
    pub fn press_f12(self) -> Self {
        match self {
            Self::InGame => Self::MessageLog,
            Self::MessageLog => Self::InGame,
            other => other,
        }
    }

    /// Manual on/off switch, only meaningful during a match.
    pub fn toggle(self) -> Self {
        match self {
            Self::InGame => Self::Disabled,
            Self::Disabled => Self::InGame,
            other => other,
        }
    }
}
