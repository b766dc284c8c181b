//! Recording fakes of the service contracts for action tests.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use futures::future::{self, BoxFuture, FutureExt};

use crate::{
    config::{AppConfig, Endpoint},
    error::{ServiceError, ServiceResult},
    services::contracts::{
        AuthenticationService, EndpointService, FileService, ItemHotkeyRegistrationService,
        UpdateService, VersionService,
    },
    state::{
        AppState, Services, SharedState, SseHub,
        hotkeys::{ClickCombination, HotKey},
        session::{LoginGateway, W3cToken},
    },
};

#[derive(Default)]
pub struct FakeServices {
    calls: Mutex<Vec<String>>,
    pub endpoint: Mutex<Option<Endpoint>>,
    pub selected: Mutex<Option<Endpoint>>,
    pub mode: AtomicBool,
    pub china_proxy: AtomicBool,
    pub hot_keys: Mutex<Vec<HotKey>>,
    pub port: Mutex<String>,
    pub token: Mutex<Option<W3cToken>>,
    pub user_info: Mutex<Option<W3cToken>>,
    pub authorized: Mutex<Option<W3cToken>>,
    pub update_fails: AtomicBool,
}

impl FakeServices {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    /// Calls recorded so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

/// Endpoint pointing at a closed local port so HTTP calls fail fast.
pub fn endpoint(name: &str) -> Endpoint {
    Endpoint {
        name: name.into(),
        ping_url: "http://127.0.0.1:9/".into(),
        update_url: "http://127.0.0.1:9/".into(),
        news_url: "http://127.0.0.1:9/".into(),
        identification_url: "http://127.0.0.1:9/".into(),
        identification_public_key: String::new(),
        override_update_file_download_url: None,
        test: false,
    }
}

pub fn token(battle_tag: &str) -> W3cToken {
    W3cToken {
        jwt: format!("jwt-{battle_tag}"),
        battle_tag: battle_tag.into(),
        expires_at: None,
    }
}

/// Build an [`AppState`] wired to a fresh [`FakeServices`].
pub fn fake_state() -> (SharedState, Arc<FakeServices>) {
    let fake = Arc::new(FakeServices::default());
    let services = Services {
        update: fake.clone(),
        version: fake.clone(),
        file: fake.clone(),
        hotkeys: fake.clone(),
        auth: fake.clone(),
        endpoints: fake.clone(),
    };
    let state = AppState::new(AppConfig::default(), services, SseHub::new(8));
    (state, fake)
}

impl UpdateService for FakeServices {
    fn check_for_update(&self) -> BoxFuture<'static, ServiceResult<()>> {
        self.record("check_for_update");
        let result = if self.update_fails.load(Ordering::SeqCst) {
            Err(ServiceError::Unavailable("updater offline".into()))
        } else {
            Ok(())
        };
        future::ready(result).boxed()
    }
}

impl VersionService for FakeServices {
    fn switch_to_mode(&self, is_test: bool) -> BoxFuture<'static, ServiceResult<()>> {
        self.record(format!("switch_to_mode({is_test})"));
        self.mode.store(is_test, Ordering::SeqCst);
        future::ready(Ok(())).boxed()
    }

    fn load_mode(&self) -> bool {
        self.mode.load(Ordering::SeqCst)
    }

    fn save_is_china_proxy_enabled(&self, enabled: bool) -> BoxFuture<'static, ServiceResult<()>> {
        self.record(format!("save_is_china_proxy_enabled({enabled})"));
        self.china_proxy.store(enabled, Ordering::SeqCst);
        future::ready(Ok(())).boxed()
    }

    fn load_is_china_proxy_enabled(&self) -> bool {
        self.china_proxy.load(Ordering::SeqCst)
    }
}

impl FileService for FakeServices {
    fn is_windows(&self) -> bool {
        true
    }
}

impl ItemHotkeyRegistrationService for FakeServices {
    fn register_key(&self, hot_key: &HotKey) {
        self.record(format!("register_key({})", hot_key.combo));
    }

    fn enable_hot_keys(&self) {
        self.record("enable_hot_keys");
    }

    fn disable_hot_keys(&self) {
        self.record("disable_hot_keys");
    }

    fn toggle_on_off(&self, combo: &ClickCombination) {
        self.record(format!("toggle_on_off({combo})"));
    }

    fn save_hot_keys(&self, hot_keys: Vec<HotKey>) -> BoxFuture<'static, ServiceResult<()>> {
        self.record(format!("save_hot_keys({})", hot_keys.len()));
        *self.hot_keys.lock().unwrap() = hot_keys;
        future::ready(Ok(())).boxed()
    }

    fn load_hot_keys(&self) -> Vec<HotKey> {
        self.hot_keys.lock().unwrap().clone()
    }

    fn save_last_w3c_port(&self, port: String) -> BoxFuture<'static, ServiceResult<()>> {
        self.record(format!("save_last_w3c_port({port})"));
        *self.port.lock().unwrap() = port;
        future::ready(Ok(())).boxed()
    }

    fn load_last_w3c_port(&self) -> String {
        self.port.lock().unwrap().clone()
    }
}

impl AuthenticationService for FakeServices {
    fn load_auth_token(&self) -> Option<W3cToken> {
        self.token.lock().unwrap().clone()
    }

    fn get_user_info(&self, jwt: &str) -> Option<W3cToken> {
        self.record(format!("get_user_info({jwt})"));
        self.user_info.lock().unwrap().clone()
    }

    fn authorize(
        &self,
        code: String,
        gateway: LoginGateway,
    ) -> BoxFuture<'static, ServiceResult<Option<W3cToken>>> {
        self.record(format!("authorize({code}, {gateway:?})"));
        future::ready(Ok(self.authorized.lock().unwrap().clone())).boxed()
    }

    fn save_auth_token(&self, token: W3cToken) -> BoxFuture<'static, ServiceResult<()>> {
        self.record(format!("save_auth_token({})", token.battle_tag));
        *self.token.lock().unwrap() = Some(token);
        future::ready(Ok(())).boxed()
    }

    fn delete_auth_token(&self) -> BoxFuture<'static, ServiceResult<()>> {
        self.record("delete_auth_token");
        self.token.lock().unwrap().take();
        future::ready(Ok(())).boxed()
    }

    fn request_login(&self, gateway: LoginGateway) {
        self.record(format!("request_login({gateway:?})"));
    }
}

impl EndpointService for FakeServices {
    fn select_fastest_endpoint(&self, is_test: bool) -> BoxFuture<'static, ServiceResult<Endpoint>> {
        self.record(format!("select_fastest_endpoint({is_test})"));
        let result = match self.endpoint.lock().unwrap().clone() {
            Some(endpoint) => {
                *self.selected.lock().unwrap() = Some(endpoint.clone());
                Ok(endpoint)
            }
            None => Err(ServiceError::Unavailable("no endpoint answered".into())),
        };
        future::ready(result).boxed()
    }

    fn selected(&self) -> Option<Endpoint> {
        self.selected.lock().unwrap().clone()
    }
}
