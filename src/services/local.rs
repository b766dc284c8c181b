//! In-process implementations of the service contracts used by the daemon binary.
//!
//! Settings are persisted to a single JSON file, the native key hook is modelled by an
//! in-memory registry, and anything that needs the host process (updater, OAuth window)
//! is forwarded on the host SSE stream.

use std::{
    fs,
    io::ErrorKind,
    path::PathBuf,
    sync::{
        Arc, Mutex, MutexGuard, RwLock,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use futures::future::{self, BoxFuture, FutureExt};
use indexmap::IndexMap;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use crate::{
    config::{AppConfig, Endpoint},
    dto::sse::{OAuthRequestedEvent, ServerEvent},
    error::{ServiceError, ServiceResult},
    services::contracts::{
        AuthenticationService, EndpointService, FileService, ItemHotkeyRegistrationService,
        UpdateService, VersionService,
    },
    state::{
        Services,
        hotkeys::{ClickCombination, HotKey},
        session::{LoginGateway, W3cToken},
        sse::SseHub,
    },
};

const EVENT_CHECK_FOR_UPDATE: &str = "check_for_update";
const EVENT_OAUTH_REQUESTED: &str = "oauth_requested";
const PING_TIMEOUT: Duration = Duration::from_secs(3);
const AUTHORIZE_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the local service bundle for `config`, forwarding host requests on `host`.
pub fn services(config: &AppConfig, host: SseHub) -> Services {
    let settings = Arc::new(SettingsFile::open(config.settings_path().clone()));
    let client = reqwest::Client::new();
    let host = HostBridge::new(host);
    let endpoints = Arc::new(HttpEndpointService::new(client.clone(), config.clone()));

    Services {
        update: Arc::new(host.clone()),
        version: Arc::new(LocalVersionService::new(settings.clone())),
        file: Arc::new(LocalFileService),
        hotkeys: Arc::new(LocalHotkeyRegistry::new(settings.clone())),
        auth: Arc::new(HttpAuthenticationService::new(
            client,
            settings,
            endpoints.clone(),
            host,
        )),
        endpoints,
    }
}

/// On-disk representation of the user settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Settings {
    #[serde(default)]
    is_test: bool,
    #[serde(default)]
    china_proxy: bool,
    #[serde(default)]
    hot_keys: Vec<HotKey>,
    #[serde(default)]
    last_w3c_port: String,
    #[serde(default)]
    auth_token: Option<W3cToken>,
}

/// JSON settings file shared by the local services.
///
/// Readers see the last state that reached the disk. Writers are serialized and only
/// commit in memory after the file was written.
pub struct SettingsFile {
    path: PathBuf,
    current: Mutex<Settings>,
    writer: AsyncMutex<()>,
}

impl SettingsFile {
    /// Read `path`, starting from defaults when it is missing or unreadable.
    pub fn open(path: PathBuf) -> Self {
        let current = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "settings file is corrupt; using defaults");
                Settings::default()
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file yet");
                Settings::default()
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read settings; using defaults");
                Settings::default()
            }
        };

        Self {
            path,
            current: Mutex::new(current),
            writer: AsyncMutex::new(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Settings> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read<T>(&self, f: impl FnOnce(&Settings) -> T) -> T {
        f(&self.lock())
    }

    /// Apply `f` to a copy, write it to disk, then make it current.
    async fn update(&self, f: impl FnOnce(&mut Settings) + Send) -> ServiceResult<()> {
        let _writer = self.writer.lock().await;
        let mut next = self.read(Settings::clone);
        f(&mut next);

        let contents = serde_json::to_string_pretty(&next)
            .map_err(|err| ServiceError::persistence("serializing settings", err))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| ServiceError::persistence("creating settings directory", err))?;
        }
        tokio::fs::write(&self.path, contents)
            .await
            .map_err(|err| ServiceError::persistence("writing settings", err))?;

        *self.lock() = next;
        Ok(())
    }
}

/// Forwards requests to the host process over the host SSE stream.
#[derive(Clone)]
pub struct HostBridge {
    hub: SseHub,
}

impl HostBridge {
    /// Bridge over the host hub.
    pub fn new(hub: SseHub) -> Self {
        Self { hub }
    }

    fn send(&self, event: ServerEvent) {
        let receivers = self.hub.broadcast(event.clone());
        if receivers == 0 {
            warn!(event = ?event.event, "no host connected; request dropped");
        }
    }
}

impl UpdateService for HostBridge {
    fn check_for_update(&self) -> BoxFuture<'static, ServiceResult<()>> {
        self.send(ServerEvent::new(
            Some(EVENT_CHECK_FOR_UPDATE.to_string()),
            "{}".to_string(),
        ));
        future::ready(Ok(())).boxed()
    }
}

/// Mode and proxy flags persisted in the settings file.
pub struct LocalVersionService {
    settings: Arc<SettingsFile>,
}

impl LocalVersionService {
    /// Service backed by `settings`.
    pub fn new(settings: Arc<SettingsFile>) -> Self {
        Self { settings }
    }
}

impl VersionService for LocalVersionService {
    fn switch_to_mode(&self, is_test: bool) -> BoxFuture<'static, ServiceResult<()>> {
        info!(is_test, "switching environment");
        let settings = self.settings.clone();
        async move { settings.update(|settings| settings.is_test = is_test).await }.boxed()
    }

    fn load_mode(&self) -> bool {
        self.settings.read(|settings| settings.is_test)
    }

    fn save_is_china_proxy_enabled(&self, enabled: bool) -> BoxFuture<'static, ServiceResult<()>> {
        let settings = self.settings.clone();
        async move { settings.update(|settings| settings.china_proxy = enabled).await }.boxed()
    }

    fn load_is_china_proxy_enabled(&self) -> bool {
        self.settings.read(|settings| settings.china_proxy)
    }
}

/// OS facts of the running process.
pub struct LocalFileService;

impl FileService for LocalFileService {
    fn is_windows(&self) -> bool {
        cfg!(windows)
    }
}

/// Registry standing in for the native key hook: bindings live in memory and are
/// persisted through the settings file.
pub struct LocalHotkeyRegistry {
    settings: Arc<SettingsFile>,
    registered: Mutex<IndexMap<ClickCombination, HotKey>>,
    enabled: AtomicBool,
}

impl LocalHotkeyRegistry {
    /// Empty, disabled registry persisting through `settings`.
    pub fn new(settings: Arc<SettingsFile>) -> Self {
        Self {
            settings,
            registered: Mutex::new(IndexMap::new()),
            enabled: AtomicBool::new(false),
        }
    }

    /// Whether bindings are currently forwarded.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Binding registered for `combo`, if any.
    #[cfg(test)]
    fn binding(&self, combo: &ClickCombination) -> Option<HotKey> {
        self.registered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(combo)
            .cloned()
    }
}

impl ItemHotkeyRegistrationService for LocalHotkeyRegistry {
    fn register_key(&self, hot_key: &HotKey) {
        debug!(combo = %hot_key.combo, item_slot = hot_key.item_slot, "registering hotkey");
        self.registered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(hot_key.combo.clone(), hot_key.clone());
    }

    fn enable_hot_keys(&self) {
        if !self.enabled.swap(true, Ordering::SeqCst) {
            info!("hotkeys enabled");
        }
    }

    fn disable_hot_keys(&self) {
        if self.enabled.swap(false, Ordering::SeqCst) {
            info!("hotkeys disabled");
        }
    }

    fn toggle_on_off(&self, combo: &ClickCombination) {
        info!(%combo, "hotkey toggle chord changed");
    }

    fn save_hot_keys(&self, hot_keys: Vec<HotKey>) -> BoxFuture<'static, ServiceResult<()>> {
        let settings = self.settings.clone();
        async move { settings.update(|settings| settings.hot_keys = hot_keys).await }.boxed()
    }

    fn load_hot_keys(&self) -> Vec<HotKey> {
        let hot_keys = self.settings.read(|settings| settings.hot_keys.clone());
        for hot_key in &hot_keys {
            self.register_key(hot_key);
        }
        hot_keys
    }

    fn save_last_w3c_port(&self, port: String) -> BoxFuture<'static, ServiceResult<()>> {
        let settings = self.settings.clone();
        async move { settings.update(|settings| settings.last_w3c_port = port).await }.boxed()
    }

    fn load_last_w3c_port(&self) -> String {
        self.settings.read(|settings| settings.last_w3c_port.clone())
    }
}

/// Races the configured endpoints of an environment and keeps the first that answers.
pub struct HttpEndpointService {
    client: reqwest::Client,
    config: AppConfig,
    selected: Arc<RwLock<Option<Endpoint>>>,
}

impl HttpEndpointService {
    /// Service with no endpoint selected yet.
    pub fn new(client: reqwest::Client, config: AppConfig) -> Self {
        Self {
            client,
            config,
            selected: Arc::new(RwLock::new(None)),
        }
    }
}

impl EndpointService for HttpEndpointService {
    fn select_fastest_endpoint(&self, is_test: bool) -> BoxFuture<'static, ServiceResult<Endpoint>> {
        let candidates = self.config.endpoints(is_test);
        let client = self.client.clone();
        let selected = self.selected.clone();

        async move {
            if candidates.is_empty() {
                return Err(ServiceError::Unavailable(format!(
                    "no endpoint configured (test: {is_test})"
                )));
            }

            let pings = candidates.into_iter().map(|endpoint| {
                let client = client.clone();
                async move {
                    client
                        .get(&endpoint.ping_url)
                        .timeout(PING_TIMEOUT)
                        .send()
                        .await?
                        .error_for_status()?;
                    Ok::<_, ServiceError>(endpoint)
                }
                .boxed()
            });

            let (endpoint, _pending) = future::select_ok(pings).await?;
            info!(name = %endpoint.name, "selected endpoint");
            *selected
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(endpoint.clone());
            Ok(endpoint)
        }
        .boxed()
    }

    fn selected(&self) -> Option<Endpoint> {
        self.selected
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// Exchanges OAuth codes with the identification service of the selected endpoint.
///
/// `get_user_info` only recognises the token this daemon persisted; signature checks
/// against the identification public key belong to the identification service.
pub struct HttpAuthenticationService {
    client: reqwest::Client,
    settings: Arc<SettingsFile>,
    endpoints: Arc<HttpEndpointService>,
    host: HostBridge,
}

impl HttpAuthenticationService {
    /// Requests for a login window go through `host`.
    pub fn new(
        client: reqwest::Client,
        settings: Arc<SettingsFile>,
        endpoints: Arc<HttpEndpointService>,
        host: HostBridge,
    ) -> Self {
        Self {
            client,
            settings,
            endpoints,
            host,
        }
    }
}

impl AuthenticationService for HttpAuthenticationService {
    fn load_auth_token(&self) -> Option<W3cToken> {
        self.settings.read(|settings| settings.auth_token.clone())
    }

    fn get_user_info(&self, jwt: &str) -> Option<W3cToken> {
        if jwt.is_empty() {
            return None;
        }
        let now = OffsetDateTime::now_utc().unix_timestamp();
        self.load_auth_token()
            .filter(|token| token.jwt == jwt && !token.is_expired_at(now))
    }

    fn authorize(
        &self,
        code: String,
        gateway: LoginGateway,
    ) -> BoxFuture<'static, ServiceResult<Option<W3cToken>>> {
        let client = self.client.clone();
        let endpoint = self.endpoints.selected();

        async move {
            let endpoint = endpoint
                .ok_or_else(|| ServiceError::Unavailable("no endpoint selected".into()))?;
            let url = format!("{}api/oauth/token", endpoint.identification_url);
            let response = client
                .get(url)
                .query(&[("code", code.as_str())])
                .query(&[("region", gateway)])
                .timeout(AUTHORIZE_TIMEOUT)
                .send()
                .await?;

            match response.status() {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::BAD_REQUEST => {
                    warn!(status = %response.status(), "identification service refused the code");
                    Ok(None)
                }
                _ => Ok(Some(response.error_for_status()?.json::<W3cToken>().await?)),
            }
        }
        .boxed()
    }

    fn save_auth_token(&self, token: W3cToken) -> BoxFuture<'static, ServiceResult<()>> {
        let settings = self.settings.clone();
        async move { settings.update(|settings| settings.auth_token = Some(token)).await }.boxed()
    }

    fn delete_auth_token(&self) -> BoxFuture<'static, ServiceResult<()>> {
        let settings = self.settings.clone();
        async move { settings.update(|settings| settings.auth_token = None).await }.boxed()
    }

    fn request_login(&self, gateway: LoginGateway) {
        match ServerEvent::json(
            Some(EVENT_OAUTH_REQUESTED.to_string()),
            &OAuthRequestedEvent { gateway },
        ) {
            Ok(event) => self.host.send(event),
            Err(err) => warn!(error = %err, "failed to serialize oauth request"),
        }
    }
}
