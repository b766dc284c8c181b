use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::{
    broadcast::{self, error::RecvError},
    mpsc,
};
use tokio_stream::wrappers::ReceiverStream;

use crate::{dto::sse::ServerEvent, state::SseHub};

/// Identifies the target SSE stream for connection bookkeeping.
#[derive(Clone, Copy, Debug)]
pub enum StreamKind {
    /// Renderer state notifications.
    Ui,
    /// Requests for the host process.
    Host,
}

/// Convert a broadcast receiver into an SSE response, forwarding events until the
/// client disconnects.
pub fn to_sse_stream(
    mut receiver: broadcast::Receiver<ServerEvent>,
    kind: StreamKind,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(payload) => {
                            let mut event = Event::default().data(payload.data);
                            if let Some(name) = payload.event {
                                event = event.event(name);
                            }

                            if tx.send(Ok(event)).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::debug!(?kind, skipped, "SSE subscriber lagging; skipping events");
                            continue;
                        }
                    }
                }
            }
        }

        tracing::info!(?kind, "SSE stream disconnected");
    });

    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Send a human-readable info message onto a stream.
pub fn broadcast_info(hub: &SseHub, message: &str) {
    hub.broadcast(ServerEvent::new(
        Some("info".to_string()),
        message.to_string(),
    ));
}
