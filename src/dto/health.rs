use serde::Serialize;
use utoipa::ToSchema;

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Name of the selected W3Champions endpoint.
    pub endpoint: Option<String>,
}

impl HealthResponse {
    /// An endpoint answered and was selected.
    pub fn ok(endpoint: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            endpoint: Some(endpoint.into()),
        }
    }

    /// No endpoint has answered yet.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
            endpoint: None,
        }
    }
}
