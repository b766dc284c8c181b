//! Live game status tracking fed by the game-integration worker.
//!
//! [`reduce`] folds one [`StatusEvent`] into the current [`GameStatusSnapshot`]. It never
//! fails: events that cannot be applied (no session yet, stale game id, unknown player)
//! leave the snapshot untouched.

use std::collections::HashMap;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::value::{Error as ValueError, StrDeserializer},
};
use tracing::debug;
use utoipa::ToSchema;

/// Identifier of a player as reported by the game-integration worker.
pub type PlayerId = i32;

/// Status of the game as last reported by the worker.
///
/// Besides its own lifecycle values, a game takes the client status carried by a
/// single-slot update, so both vocabularies share this wire type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Lobby is being set up.
    Preparing,
    /// Lobby is open.
    Created,
    /// Match in progress.
    Running,
    /// Match paused.
    Paused,
    /// Match finished.
    Ended,
    /// Game closed by the server.
    Terminated,
    /// Client status reported by a [`StatusEvent::GameSlotClientStatusUpdate`].
    Client(SlotClientStatus),
    /// Any value this build does not know.
    Unknown,
}

impl GameStatus {
    fn from_name(name: &str) -> Self {
        match name {
            "Preparing" => Self::Preparing,
            "Created" => Self::Created,
            "Running" => Self::Running,
            "Paused" => Self::Paused,
            "Ended" => Self::Ended,
            "Terminated" => Self::Terminated,
            other => match SlotClientStatus::deserialize(StrDeserializer::<ValueError>::new(other)) {
                Ok(SlotClientStatus::Unknown) | Err(_) => Self::Unknown,
                Ok(client_status) => Self::Client(client_status),
            },
        }
    }
}

impl From<SlotClientStatus> for GameStatus {
    fn from(value: SlotClientStatus) -> Self {
        Self::Client(value)
    }
}

impl Serialize for GameStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let name = match self {
            Self::Preparing => "Preparing",
            Self::Created => "Created",
            Self::Running => "Running",
            Self::Paused => "Paused",
            Self::Ended => "Ended",
            Self::Terminated => "Terminated",
            Self::Unknown => "Unknown",
            Self::Client(client_status) => return client_status.serialize(serializer),
        };
        serializer.serialize_str(name)
    }
}

impl<'de> Deserialize<'de> for GameStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

/// Connection/readiness status of a client occupying a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum SlotClientStatus {
    /// Slot reserved, client not connected yet.
    #[default]
    Pending,
    /// Client connected to the game server.
    Connected,
    /// Client joined the lobby.
    Joined,
    /// Map loading.
    Loading,
    /// Map loaded.
    Loaded,
    /// Ready to start.
    Ready,
    /// Connection lost.
    Disconnected,
    /// Player left the game.
    Left,
    /// Any status this build does not know.
    #[serde(other)]
    Unknown,
}

/// Minimal player reference carried by sessions and slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PlayerRef {
    /// Player id.
    pub id: PlayerId,
    /// Display name, when known.
    #[serde(default)]
    pub name: Option<String>,
}

/// A roster position within a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Slot {
    /// Occupant, `None` for an open or closed slot.
    #[serde(default)]
    pub player: Option<PlayerRef>,
    /// Client status of the occupant.
    #[serde(default)]
    pub client_status: SlotClientStatus,
}

impl Slot {
    fn is_player(&self, player_id: PlayerId) -> bool {
        self.player.as_ref().is_some_and(|player| player.id == player_id)
    }
}

/// Game record as announced by `CurrentGameInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GameInfo {
    /// Game id.
    pub id: String,
    /// Game status, or a slot client status after a single-slot update.
    #[schema(value_type = String)]
    pub status: GameStatus,
    /// Roster in slot order.
    #[serde(default)]
    pub slots: Vec<Slot>,
}

/// Current status as displayed by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct GameStatusSnapshot {
    /// Player the worker reports for.
    pub player_id: Option<PlayerId>,
    /// Player display name.
    pub name: Option<String>,
    /// Game the player is in, if any.
    pub game: Option<GameInfo>,
}

/// Messages pushed by the game-integration worker, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StatusEvent {
    /// The worker (re)connected on behalf of a player.
    PlayerSession {
        /// Player the worker acts for.
        #[serde(default)]
        player: Option<PlayerRef>,
    },
    /// The player's session moved in or out of a game.
    PlayerSessionUpdate {
        /// Game the session joined, `null` when it left one.
        #[serde(default)]
        game_id: Option<String>,
    },
    /// Full description of the game the player is in.
    CurrentGameInfo(GameInfo),
    /// Game status change with a batch of slot client statuses.
    GameStatusUpdate {
        /// Game the update is for.
        game_id: String,
        /// New game status.
        status: GameStatus,
        /// Client statuses keyed by player id.
        #[serde(default, deserialize_with = "player_id_keys")]
        updated_player_game_client_status_map: HashMap<PlayerId, SlotClientStatus>,
    },
    /// Client status change for a single slot.
    GameSlotClientStatusUpdate {
        /// Game the update is for.
        game_id: String,
        /// Player whose slot changed.
        player_id: PlayerId,
        /// New client status.
        status: SlotClientStatus,
    },
    /// Any other `type`. Ignored.
    #[serde(other)]
    Unknown,
}

impl StatusEvent {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PlayerSession { .. } => "PlayerSession",
            Self::PlayerSessionUpdate { .. } => "PlayerSessionUpdate",
            Self::CurrentGameInfo(_) => "CurrentGameInfo",
            Self::GameStatusUpdate { .. } => "GameStatusUpdate",
            Self::GameSlotClientStatusUpdate { .. } => "GameSlotClientStatusUpdate",
            Self::Unknown => "Unknown",
        }
    }
}

/// JSON object keys are strings; internally tagged enums buffer them before the
/// integer conversion serde_json would normally do, so parse them here.
///
/// Only canonical decimal keys name a player. Other keys cannot match a slot and are
/// skipped so the rest of the update still applies.
fn player_id_keys<'de, D>(deserializer: D) -> Result<HashMap<PlayerId, SlotClientStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<String, SlotClientStatus>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, status)| match key.parse::<PlayerId>() {
            Ok(id) if id.to_string() == key => Some((id, status)),
            _ => {
                debug!(key = %key, "skipping status entry without a player id");
                None
            }
        })
        .collect())
}

/// Apply `event` to `current` and return the resulting snapshot.
pub fn reduce(
    current: Option<GameStatusSnapshot>,
    event: StatusEvent,
) -> Option<GameStatusSnapshot> {
    match event {
        StatusEvent::PlayerSession { player } => {
            let mut snapshot = current.unwrap_or_default();
            snapshot.player_id = player.as_ref().map(|player| player.id);
            snapshot.name = player.and_then(|player| player.name);
            Some(snapshot)
        }
        // Session updates never clear the game, even without a game id.
        StatusEvent::PlayerSessionUpdate { .. } => current,
        StatusEvent::CurrentGameInfo(game) => current.map(|mut snapshot| {
            snapshot.game = Some(game);
            snapshot
        }),
        StatusEvent::GameStatusUpdate {
            game_id,
            status,
            updated_player_game_client_status_map,
        } => with_matching_game(current, &game_id, |game| {
            game.status = status;
            for (player_id, client_status) in updated_player_game_client_status_map {
                if let Some(slot) = game.slots.iter_mut().find(|slot| slot.is_player(player_id)) {
                    slot.client_status = client_status;
                }
            }
        }),
        StatusEvent::GameSlotClientStatusUpdate {
            game_id,
            player_id,
            status,
        } => with_matching_game(current, &game_id, |game| {
            game.status = status.into();
            if let Some(slot) = game.slots.iter_mut().find(|slot| slot.is_player(player_id)) {
                slot.client_status = status;
            }
        }),
        StatusEvent::Unknown => current,
    }
}

/// Fold a sequence of events in arrival order.
pub fn fold<I>(initial: Option<GameStatusSnapshot>, events: I) -> Option<GameStatusSnapshot>
where
    I: IntoIterator<Item = StatusEvent>,
{
    events.into_iter().fold(initial, reduce)
}

/// Run `update` on the current game only when its id equals `game_id`.
fn with_matching_game<F>(
    current: Option<GameStatusSnapshot>,
    game_id: &str,
    update: F,
) -> Option<GameStatusSnapshot>
where
    F: FnOnce(&mut GameInfo),
{
    let mut snapshot = current?;
    if let Some(game) = snapshot.game.as_mut().filter(|game| game.id == game_id) {
        update(game);
    }
    Some(snapshot)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn player(id: PlayerId, name: &str) -> PlayerRef {
        PlayerRef {
            id,
            name: Some(name.into()),
        }
    }

    fn slot(id: PlayerId) -> Slot {
        Slot {
            player: Some(PlayerRef { id, name: None }),
            client_status: SlotClientStatus::Pending,
        }
    }

    fn session_in_game(game_id: &str, players: &[PlayerId]) -> Option<GameStatusSnapshot> {
        fold(
            None,
            [
                StatusEvent::PlayerSession {
                    player: Some(player(1, "A")),
                },
                StatusEvent::CurrentGameInfo(GameInfo {
                    id: game_id.into(),
                    status: GameStatus::Created,
                    slots: players.iter().copied().map(slot).collect(),
                }),
            ],
        )
    }

    #[test]
    fn player_session_creates_snapshot_without_game() {
        let snapshot = reduce(
            None,
            StatusEvent::PlayerSession {
                player: Some(player(7, "Grubby")),
            },
        )
        .unwrap();

        assert_eq!(snapshot.player_id, Some(7));
        assert_eq!(snapshot.name.as_deref(), Some("Grubby"));
        assert!(snapshot.game.is_none());
    }

    #[test]
    fn player_session_keeps_existing_game() {
        let before = session_in_game("g1", &[1]);
        let after = reduce(
            before.clone(),
            StatusEvent::PlayerSession {
                player: Some(player(2, "B")),
            },
        )
        .unwrap();

        assert_eq!(after.player_id, Some(2));
        assert_eq!(after.game, before.unwrap().game);
    }

    #[test]
    fn current_game_info_before_session_is_ignored() {
        let snapshot = reduce(
            None,
            StatusEvent::CurrentGameInfo(GameInfo {
                id: "g1".into(),
                status: GameStatus::Created,
                slots: vec![slot(1)],
            }),
        );
        assert!(snapshot.is_none());
    }

    #[test]
    fn session_update_without_game_keeps_game() {
        let before = session_in_game("g1", &[1]);
        let after = reduce(
            before.clone(),
            StatusEvent::PlayerSessionUpdate { game_id: None },
        );
        assert_eq!(after, before);
    }

    #[test]
    fn game_status_update_with_other_game_is_dropped() {
        let before = session_in_game("g1", &[1, 2]);
        let after = reduce(
            before.clone(),
            StatusEvent::GameStatusUpdate {
                game_id: "g2".into(),
                status: GameStatus::Running,
                updated_player_game_client_status_map: HashMap::from([(
                    1,
                    SlotClientStatus::Loaded,
                )]),
            },
        );
        assert_eq!(after, before);
    }

    #[test]
    fn game_status_update_applies_status_and_slots() {
        let before = session_in_game("g1", &[1, 2, 3]);
        let after = reduce(
            before,
            StatusEvent::GameStatusUpdate {
                game_id: "g1".into(),
                status: GameStatus::Running,
                updated_player_game_client_status_map: HashMap::from([
                    (1, SlotClientStatus::Loaded),
                    (3, SlotClientStatus::Disconnected),
                    (99, SlotClientStatus::Left),
                ]),
            },
        )
        .unwrap();

        let game = after.game.unwrap();
        assert_eq!(game.status, GameStatus::Running);
        let statuses: Vec<_> = game.slots.iter().map(|s| s.client_status).collect();
        assert_eq!(
            statuses,
            vec![
                SlotClientStatus::Loaded,
                SlotClientStatus::Pending,
                SlotClientStatus::Disconnected
            ]
        );
    }

    #[test]
    fn slot_update_touches_exactly_one_slot() {
        let before = session_in_game("g1", &[1, 2, 3]);
        let after = reduce(
            before.clone(),
            StatusEvent::GameSlotClientStatusUpdate {
                game_id: "g1".into(),
                player_id: 2,
                status: SlotClientStatus::Joined,
            },
        )
        .unwrap();

        let before_slots = before.unwrap().game.unwrap().slots;
        let after_slots = after.game.unwrap().slots;
        let changed: Vec<_> = before_slots
            .iter()
            .zip(after_slots.iter())
            .enumerate()
            .filter(|(_, (old, new))| old != new)
            .map(|(index, _)| index)
            .collect();
        assert_eq!(changed, vec![1]);
        assert_eq!(after_slots[1].client_status, SlotClientStatus::Joined);
    }

    #[test]
    fn empty_slots_never_match() {
        let mut before = session_in_game("g1", &[1]).unwrap();
        if let Some(game) = before.game.as_mut() {
            game.slots.insert(
                0,
                Slot {
                    player: None,
                    client_status: SlotClientStatus::Pending,
                },
            );
        }

        let after = reduce(
            Some(before),
            StatusEvent::GameSlotClientStatusUpdate {
                game_id: "g1".into(),
                player_id: 1,
                status: SlotClientStatus::Ready,
            },
        )
        .unwrap();
        let slots = after.game.unwrap().slots;
        assert_eq!(slots[0].client_status, SlotClientStatus::Pending);
        assert_eq!(slots[1].client_status, SlotClientStatus::Ready);
    }

    #[test]
    fn scenario_ready_slot_from_wire_messages() {
        let events: Vec<StatusEvent> = serde_json::from_value(json!([
            { "type": "PlayerSession", "player": { "id": 1, "name": "A" } },
            { "type": "CurrentGameInfo", "id": "g1", "status": "Created",
              "slots": [ { "player": { "id": 1 } } ] },
            { "type": "GameSlotClientStatusUpdate", "game_id": "g1", "player_id": 1,
              "status": "Ready" }
        ]))
        .unwrap();

        let snapshot = fold(None, events).unwrap();
        assert_eq!(snapshot.player_id, Some(1));
        let game = snapshot.game.unwrap();
        assert_eq!(game.id, "g1");
        assert_eq!(game.status, GameStatus::Client(SlotClientStatus::Ready));
        assert_eq!(game.slots[0].client_status, SlotClientStatus::Ready);
    }

    #[test]
    fn scenario_stale_slot_update_is_dropped() {
        let events: Vec<StatusEvent> = serde_json::from_value(json!([
            { "type": "PlayerSession", "player": { "id": 1, "name": "A" } },
            { "type": "CurrentGameInfo", "id": "g1", "status": "Created",
              "slots": [ { "player": { "id": 1 } } ] },
            { "type": "GameSlotClientStatusUpdate", "game_id": "g2", "player_id": 1,
              "status": "Ready" }
        ]))
        .unwrap();

        let game = fold(None, events).unwrap().game.unwrap();
        assert_eq!(game.status, GameStatus::Created);
        assert_eq!(game.slots[0].client_status, SlotClientStatus::Pending);
    }

    #[test]
    fn status_map_keys_parse_as_player_ids() {
        let event: StatusEvent = serde_json::from_value(json!({
            "type": "GameStatusUpdate",
            "game_id": "g1",
            "status": "Running",
            "updated_player_game_client_status_map": { "1": "Loading", "2": "Loaded" }
        }))
        .unwrap();

        match event {
            StatusEvent::GameStatusUpdate {
                updated_player_game_client_status_map: map,
                ..
            } => {
                assert_eq!(map.get(&1), Some(&SlotClientStatus::Loading));
                assert_eq!(map.get(&2), Some(&SlotClientStatus::Loaded));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn unknown_event_type_is_ignored() {
        let event: StatusEvent =
            serde_json::from_value(json!({ "type": "PlayerMuteListUpdate", "mutes": [] }))
                .unwrap();
        assert_eq!(event, StatusEvent::Unknown);

        let before = session_in_game("g1", &[1]);
        assert_eq!(reduce(before.clone(), event), before);
    }

    #[test]
    fn status_map_skips_keys_that_name_no_player() {
        let event: StatusEvent = serde_json::from_value(json!({
            "type": "GameStatusUpdate",
            "game_id": "g1",
            "status": "Running",
            "updated_player_game_client_status_map": {
                "1": "Loaded", "observer": "Left", " 2": "Left", "03": "Left"
            }
        }))
        .unwrap();

        let after = reduce(session_in_game("g1", &[1, 2, 3]), event).unwrap();
        let game = after.game.unwrap();
        assert_eq!(game.status, GameStatus::Running);
        let statuses: Vec<_> = game.slots.iter().map(|s| s.client_status).collect();
        assert_eq!(
            statuses,
            vec![
                SlotClientStatus::Loaded,
                SlotClientStatus::Pending,
                SlotClientStatus::Pending
            ]
        );
    }

    #[test]
    fn game_updates_without_snapshot_or_game_are_ignored() {
        let status_update = StatusEvent::GameStatusUpdate {
            game_id: "g1".into(),
            status: GameStatus::Running,
            updated_player_game_client_status_map: HashMap::from([(1, SlotClientStatus::Loaded)]),
        };
        let slot_update = StatusEvent::GameSlotClientStatusUpdate {
            game_id: "g1".into(),
            player_id: 1,
            status: SlotClientStatus::Ready,
        };

        assert_eq!(reduce(None, status_update.clone()), None);
        assert_eq!(reduce(None, slot_update.clone()), None);

        let no_game = reduce(
            None,
            StatusEvent::PlayerSession {
                player: Some(player(1, "A")),
            },
        );
        assert_eq!(reduce(no_game.clone(), status_update), no_game);
        assert_eq!(reduce(no_game.clone(), slot_update), no_game);
    }

    #[test]
    fn game_status_accepts_both_vocabularies() {
        let status: GameStatus = serde_json::from_value(json!("Paused")).unwrap();
        assert_eq!(status, GameStatus::Paused);

        let status: GameStatus = serde_json::from_value(json!("Loading")).unwrap();
        assert_eq!(status, GameStatus::Client(SlotClientStatus::Loading));
        assert_eq!(serde_json::to_value(status).unwrap(), json!("Loading"));

        let status: GameStatus = serde_json::from_value(json!("Exploded")).unwrap();
        assert_eq!(status, GameStatus::Unknown);
    }
}
