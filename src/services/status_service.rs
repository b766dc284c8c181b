use tracing::debug;

use crate::{
    services::sse_events::broadcast_status_changed,
    state::{
        SharedState,
        status::{self, GameStatusSnapshot, StatusEvent},
    },
};

/// Fold an inbound status event into the store and notify the renderer on change.
pub async fn update_flo_status(
    state: &SharedState,
    event: StatusEvent,
) -> Option<GameStatusSnapshot> {
    let kind = event.kind();

    let (changed, next) = {
        let mut root = state.root().write().await;
        let previous = root.flo_status.take();
        let next = status::reduce(previous.clone(), event);
        let changed = previous != next;
        root.flo_status = next.clone();
        (changed, next)
    };

    debug!(kind, changed, "applied status event");
    if changed {
        broadcast_status_changed(state, next.as_ref());
    }
    next
}

/// Last committed snapshot.
pub async fn current_status(state: &SharedState) -> Option<GameStatusSnapshot> {
    state.root().read().await.flo_status.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::fakes::fake_state,
        state::status::{GameInfo, GameStatus, PlayerRef},
    };

    #[tokio::test]
    async fn status_events_are_folded_into_root_state() {
        let (state, _fake) = fake_state();
        let mut ui = state.ui_sse().subscribe();

        update_flo_status(
            &state,
            StatusEvent::PlayerSession {
                player: Some(PlayerRef {
                    id: 1,
                    name: Some("A".into()),
                }),
            },
        )
        .await;
        update_flo_status(
            &state,
            StatusEvent::CurrentGameInfo(GameInfo {
                id: "g1".into(),
                status: GameStatus::Created,
                slots: Vec::new(),
            }),
        )
        .await;

        let current = current_status(&state).await.unwrap();
        assert_eq!(current.player_id, Some(1));
        assert_eq!(current.game.map(|game| game.id), Some("g1".to_string()));

        let first = ui.recv().await.unwrap();
        assert_eq!(first.event.as_deref(), Some("status.changed"));
    }

    #[tokio::test]
    async fn ignored_events_are_not_broadcast() {
        let (state, _fake) = fake_state();
        let mut ui = state.ui_sse().subscribe();

        let result = update_flo_status(
            &state,
            StatusEvent::CurrentGameInfo(GameInfo {
                id: "g1".into(),
                status: GameStatus::Created,
                slots: Vec::new(),
            }),
        )
        .await;

        assert!(result.is_none());
        assert!(ui.try_recv().is_err());
    }
}
