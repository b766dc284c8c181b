use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report healthy once an endpoint has been selected.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match &state.root().read().await.selected_endpoint {
        Some(endpoint) => HealthResponse::ok(endpoint.name.clone()),
        None => {
            warn!("no endpoint selected (degraded mode)");
            HealthResponse::degraded()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fakes::{endpoint, fake_state};

    #[tokio::test]
    async fn degraded_until_an_endpoint_is_selected() {
        let (state, _fake) = fake_state();
        assert_eq!(health_status(&state).await.status, "degraded");

        state.root().write().await.selected_endpoint = Some(endpoint("Europe"));
        let health = health_status(&state).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.endpoint.as_deref(), Some("Europe"));
    }
}
