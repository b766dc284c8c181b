use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    config::{Endpoint, ServiceUrls},
    state::status::GameStatusSnapshot,
};

/// Login provider selected on the login screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoginGateway {
    /// No gateway selected yet.
    #[default]
    None,
    /// Europe.
    Europe,
    /// America.
    America,
    /// China.
    China,
}

/// Token issued by the identification service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct W3cToken {
    /// Bearer token.
    pub jwt: String,
    /// Battle tag of the logged in player.
    pub battle_tag: String,
    /// Expiry as a unix timestamp in seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl W3cToken {
    /// Whether the token expired at `now` (unix seconds). Tokens without expiry never do.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

/// News entry displayed on the launcher home screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct News {
    /// Publication date as sent by the website.
    #[serde(default)]
    pub date: String,
    /// Body as HTML.
    #[serde(default)]
    pub body_html: String,
}

/// Root state of the store.
#[derive(Debug, Clone, Default)]
pub struct RootState {
    /// Test environment selected.
    pub is_test: bool,
    /// Host runs on Windows.
    pub is_windows: bool,
    /// Traffic goes through the China proxy.
    pub is_china_proxy_enabled: bool,
    /// Endpoint picked by the last successful init.
    pub selected_endpoint: Option<Endpoint>,
    /// Service URLs for the current mode and proxy.
    pub urls: ServiceUrls,
    /// News loaded last.
    pub news: Vec<News>,
    /// Current login.
    pub w3c_token: Option<W3cToken>,
    /// Gateway used for the next login.
    pub selected_login_gateway: LoginGateway,
    /// Live game status, `None` until the worker reports or after logout.
    pub flo_status: Option<GameStatusSnapshot>,
}

impl RootState {
    /// Drop the login and everything derived from it.
    pub fn logout(&mut self) {
        self.w3c_token = None;
        self.flo_status = None;
    }
}
