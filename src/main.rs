//! W3Champions companion state service: REST, status WebSocket and SSE wiring.

use std::net::SocketAddr;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use w3c_companion_state::{
    config::AppConfig,
    routes,
    services::{hotkey_service, local, session_service},
    state::{AppState, SharedState, SseHub},
};

const HOST_SSE_CAPACITY: usize = 16;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let host = SseHub::new(HOST_SSE_CAPACITY);
    let services = local::services(&config, host.clone());
    let port = config.port();

    let app_state = AppState::new(config, services, host);
    restore_persisted_state(&app_state).await;

    // Endpoint selection pings the network, so it must not delay the listener.
    tokio::spawn({
        let state = app_state.clone();
        async move {
            if session_service::init(&state).await.is_err() {
                warn!("starting without a selected endpoint");
            }
            session_service::load_news(&state).await;
        }
    });

    let app = build_router(app_state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Load the settings the renderer expects before its first request.
async fn restore_persisted_state(state: &SharedState) {
    let is_test = session_service::load_is_test_mode(state).await;
    let china_proxy = session_service::load_china_proxy(state).await;
    let is_windows = session_service::load_os_mode(state).await;
    let logged_in = session_service::load_auth_token(state).await.is_some();
    let hot_keys = hotkey_service::load_hot_keys(state).await.len();
    hotkey_service::load_last_w3c_port(state).await;

    info!(is_test, china_proxy, is_windows, logged_in, hot_keys, "persisted state restored");
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
