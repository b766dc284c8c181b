use tokio::sync::broadcast;

use crate::dto::sse::ServerEvent;

/// SSE-specific sub-state carved out from [`AppState`](super::AppState).
pub struct SseState {
    ui: SseHub,
    host: SseHub,
}

impl SseState {
    /// Build the SSE sub-tree from the UI hub and the host hub shared with the local services.
    pub fn new(ui: SseHub, host: SseHub) -> Self {
        Self { ui, host }
    }

    /// Hub carrying state change notifications for the renderer.
    pub fn ui(&self) -> &SseHub {
        &self.ui
    }

    /// Hub carrying requests addressed to the host process.
    pub fn host(&self) -> &SseHub {
        &self.host
    }
}

/// Simple broadcast hub wrapper used by the SSE services.
#[derive(Clone)]
pub struct SseHub {
    sender: broadcast::Sender<ServerEvent>,
}

impl SseHub {
    /// Construct a new hub backed by a Tokio broadcast channel with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a new subscriber that will receive subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    /// Send an event to all current subscribers, returning how many received it.
    pub fn broadcast(&self, event: ServerEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}
