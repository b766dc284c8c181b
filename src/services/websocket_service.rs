use axum::extract::ws::{Message, WebSocket};
use tracing::{debug, info, warn};

use crate::{
    services::status_service,
    state::{SharedState, status::StatusEvent},
};

/// Consume status events from the game-integration worker until it disconnects.
///
/// Frames that are not valid status events are logged and skipped; the worker keeps
/// its connection.
pub async fn handle_status_socket(state: SharedState, mut socket: WebSocket) {
    info!("status worker connected");

    while let Some(frame) = socket.recv().await {
        match frame {
            Ok(Message::Text(text)) => handle_frame(&state, text.as_str()).await,
            Ok(Message::Binary(bytes)) => match std::str::from_utf8(&bytes) {
                Ok(text) => handle_frame(&state, text).await,
                Err(err) => warn!(error = %err, "binary status frame is not utf-8"),
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                warn!(error = %err, "status socket receive error");
                break;
            }
        }
    }

    info!("status worker disconnected");
}

async fn handle_frame(state: &SharedState, text: &str) {
    match parse_status_event(text) {
        Ok(event) => {
            debug!(kind = event.kind(), "status event received");
            status_service::update_flo_status(state, event).await;
        }
        Err(err) => warn!(error = %err, "failed to parse status event"),
    }
}

fn parse_status_event(text: &str) -> serde_json::Result<StatusEvent> {
    serde_json::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_worker_frames() {
        let event =
            parse_status_event(r#"{"type":"PlayerSessionUpdate","game_id":null}"#).unwrap();
        assert_eq!(event, StatusEvent::PlayerSessionUpdate { game_id: None });

        assert!(parse_status_event("not json").is_err());
        assert!(parse_status_event(r#"{"type":"GameSlotClientStatusUpdate"}"#).is_err());
    }

    #[tokio::test]
    async fn malformed_frames_leave_state_untouched() {
        let (state, _fake) = crate::services::fakes::fake_state();
        handle_frame(&state, "{").await;
        assert!(status_service::current_status(&state).await.is_none());

        handle_frame(&state, r#"{"type":"PlayerSession","player":{"id":3,"name":"C"}}"#).await;
        let current = status_service::current_status(&state).await.unwrap();
        assert_eq!(current.player_id, Some(3));
    }
}
