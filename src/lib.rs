//! State layer of the W3Champions companion, exposing modules for the binary.

/// Runtime configuration.
pub mod config;
/// Wire payloads.
pub mod dto;
/// Error types and HTTP mapping.
pub mod error;
/// HTTP, WebSocket and SSE routes.
pub mod routes;
/// Store actions and external service implementations.
pub mod services;
/// Shared application state.
pub mod state;
