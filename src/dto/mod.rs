//! Request, response and event payloads.

/// Health check payload.
pub mod health;
/// Hotkey requests and summary.
pub mod hotkeys;
/// Session requests and summary.
pub mod session;
/// Server-Sent Events payloads.
pub mod sse;
/// Custom validators shared by the DTOs.
pub mod validation;
