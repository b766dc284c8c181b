/// Contracts of the external capabilities.
pub mod contracts;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Hotkey bindings and interaction state actions.
pub mod hotkey_service;
/// In-process implementations of the contracts.
pub mod local;
/// Environment, endpoint, news and login actions.
pub mod session_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events streaming.
pub mod sse_service;
/// Live game status actions.
pub mod status_service;
/// Status worker WebSocket handling.
pub mod websocket_service;

#[cfg(test)]
pub(crate) mod fakes;
