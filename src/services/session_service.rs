use std::time::Duration;

use tracing::{error, info, warn};

use crate::{
    config::Endpoint,
    dto::session::SessionSummary,
    error::ServiceResult,
    services::sse_events::{
        broadcast_endpoint_changed, broadcast_news_changed, broadcast_session_changed,
        broadcast_status_changed,
    },
    state::{
        SharedState,
        session::{LoginGateway, News, W3cToken},
    },
};

const NEWS_TIMEOUT: Duration = Duration::from_secs(10);

/// Pick the backend endpoint for the current mode and trigger an update check.
///
/// Failures are logged and returned; they leave the current endpoint in place.
pub async fn init(state: &SharedState) -> ServiceResult<Endpoint> {
    let is_test = state.root().read().await.is_test;
    let services = state.services();

    let selected = services
        .endpoints
        .select_fastest_endpoint(is_test)
        .await
        .inspect_err(|err| error!(error = %err, is_test, "endpoint selection failed"))?;

    // The updater cannot follow a download URL override, so skip the check then.
    if selected.override_update_file_download_url.is_none() {
        services
            .update
            .check_for_update()
            .await
            .inspect_err(|err| error!(error = %err, "update check failed"))?;
    }

    state.root().write().await.selected_endpoint = Some(selected.clone());
    broadcast_endpoint_changed(state, &selected);
    Ok(selected)
}

/// Fetch the news feed of the selected endpoint. Any failure yields an empty list.
pub async fn load_news(state: &SharedState) -> Vec<News> {
    let base = {
        let root = state.root().read().await;
        root.selected_endpoint
            .as_ref()
            .map(|endpoint| endpoint.news_url.clone())
            .unwrap_or_else(|| root.urls.news_url.clone())
    };

    let news = match fetch_news(state, &base).await {
        Ok(news) => news,
        Err(err) => {
            error!(error = %err, base = %base, "failed to load news");
            Vec::new()
        }
    };

    state.root().write().await.news = news.clone();
    broadcast_news_changed(state, &news);
    news
}

async fn fetch_news(state: &SharedState, base: &str) -> ServiceResult<Vec<News>> {
    let news = state
        .http()
        .get(format!("{base}api/admin/news"))
        .timeout(NEWS_TIMEOUT)
        .send()
        .await?
        .error_for_status()?
        .json::<Vec<News>>()
        .await?;
    Ok(news)
}

/// Switch between test and production, then reconnect and force a new login.
pub async fn set_test_mode(state: &SharedState, mode: bool) {
    if let Err(err) = state.services().version.switch_to_mode(mode).await {
        warn!(error = %err, mode, "failed to persist environment mode");
    }
    commit_mode(state, mode).await;

    // A failed init is already logged; the logout happens regardless.
    let _ = init(state).await;
    reset_authentication(state, true).await;
}

/// Restore the persisted environment mode.
pub async fn load_is_test_mode(state: &SharedState) -> bool {
    let mode = state.services().version.load_mode();
    commit_mode(state, mode).await;
    mode
}

/// Record whether the host runs on Windows.
pub async fn load_os_mode(state: &SharedState) -> bool {
    let is_windows = state.services().file.is_windows();
    state.root().write().await.is_windows = is_windows;
    is_windows
}

/// Restore the persisted China proxy flag.
pub async fn load_china_proxy(state: &SharedState) -> bool {
    let enabled = state.services().version.load_is_china_proxy_enabled();
    commit_china_proxy(state, enabled).await;
    enabled
}

/// Route traffic through the China proxy (or stop doing so) and remember the choice.
pub async fn set_china_proxy(state: &SharedState, enabled: bool) {
    commit_china_proxy(state, enabled).await;

    if let Err(err) = state
        .services()
        .version
        .save_is_china_proxy_enabled(enabled)
        .await
    {
        warn!(error = %err, enabled, "failed to persist china proxy flag");
    }
}

async fn commit_mode(state: &SharedState, mode: bool) {
    let mut root = state.root().write().await;
    root.is_test = mode;
    root.urls = state.config().urls_for(mode, root.is_china_proxy_enabled);
}

async fn commit_china_proxy(state: &SharedState, enabled: bool) {
    let mut root = state.root().write().await;
    root.is_china_proxy_enabled = enabled;
    root.urls = state.config().urls_for(root.is_test, enabled);
}

/// Restore the persisted login if the authentication service still recognises it.
pub async fn load_auth_token(state: &SharedState) -> Option<W3cToken> {
    let auth = &state.services().auth;
    let token = auth.load_auth_token();
    let jwt = token.as_ref().map(|token| token.jwt.as_str()).unwrap_or_default();

    let user_info = auth.get_user_info(jwt)?;
    info!(battle_tag = %user_info.battle_tag, "logged in");

    let gateway = {
        let mut root = state.root().write().await;
        root.w3c_token = Some(user_info.clone());
        root.selected_login_gateway
    };
    broadcast_session_changed(state, Some(&user_info), gateway);
    Some(user_info)
}

/// Exchange an OAuth code for a token on the selected gateway.
///
/// A refused or failed exchange resets the authentication and asks for a new login.
pub async fn authorize_with_code(state: &SharedState, code: String) -> Option<W3cToken> {
    let auth = &state.services().auth;
    let gateway = state.root().read().await.selected_login_gateway;

    let token = match auth.authorize(code, gateway).await {
        Ok(Some(token)) => token,
        Ok(None) => {
            reset_authentication(state, true).await;
            return None;
        }
        Err(err) => {
            error!(error = %err, ?gateway, "authorization failed");
            reset_authentication(state, true).await;
            return None;
        }
    };

    info!(battle_tag = %token.battle_tag, "logged in");
    state.root().write().await.w3c_token = Some(token.clone());
    broadcast_session_changed(state, Some(&token), gateway);

    if let Err(err) = auth.save_auth_token(token.clone()).await {
        warn!(error = %err, "failed to persist auth token");
    }
    Some(token)
}

/// Select the gateway used for the next login, notifying the renderer.
pub async fn set_login_gateway(state: &SharedState, gateway: LoginGateway) {
    let token = {
        let mut root = state.root().write().await;
        root.selected_login_gateway = gateway;
        root.w3c_token.clone()
    };
    broadcast_session_changed(state, token.as_ref(), gateway);
}

/// Log out: drop the token and the live status, and optionally ask the host for a new login.
pub async fn reset_authentication(state: &SharedState, request_relogin: bool) {
    info!("reset auth token");

    let gateway = {
        let mut root = state.root().write().await;
        root.logout();
        root.selected_login_gateway
    };
    if let Err(err) = state.services().auth.delete_auth_token().await {
        warn!(error = %err, "failed to delete auth token");
    }

    broadcast_session_changed(state, None, gateway);
    broadcast_status_changed(state, None);

    if request_relogin && state.config().oauth_enabled() {
        state.services().auth.request_login(gateway);
    }
}

/// Snapshot of the root state for the renderer.
pub async fn session_summary(state: &SharedState) -> SessionSummary {
    let root = state.root().read().await;
    SessionSummary {
        is_test: root.is_test,
        is_windows: root.is_windows,
        is_china_proxy_enabled: root.is_china_proxy_enabled,
        selected_endpoint: root.selected_endpoint.clone(),
        urls: root.urls.clone(),
        battle_tag: root.w3c_token.as_ref().map(|token| token.battle_tag.clone()),
        gateway: root.selected_login_gateway,
    }
}
