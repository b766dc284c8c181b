/// In-game interaction state machine.
pub mod hotkey_machine;
/// Hotkey bindings and module state.
pub mod hotkeys;
/// Root state, login and news.
pub mod session;
/// SSE hubs.
pub mod sse;
/// Live game status and its reducer.
pub mod status;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    config::AppConfig,
    services::contracts::{
        AuthenticationService, EndpointService, FileService, ItemHotkeyRegistrationService,
        UpdateService, VersionService,
    },
};

pub use self::sse::SseHub;
use self::{hotkeys::HotkeyModuleState, session::RootState, sse::SseState};

/// Handle to the application state, cloned into every handler.
pub type SharedState = Arc<AppState>;

const UI_SSE_CAPACITY: usize = 32;

/// External capabilities the store dispatches to.
#[derive(Clone)]
pub struct Services {
    /// Updater on the host.
    pub update: Arc<dyn UpdateService>,
    /// Environment and proxy persistence.
    pub version: Arc<dyn VersionService>,
    /// OS facts.
    pub file: Arc<dyn FileService>,
    /// Native key hook and hotkey persistence.
    pub hotkeys: Arc<dyn ItemHotkeyRegistrationService>,
    /// Login and token persistence.
    pub auth: Arc<dyn AuthenticationService>,
    /// Backend endpoint selection.
    pub endpoints: Arc<dyn EndpointService>,
}

/// Application state owned by the process entry point and shared with every action.
///
/// All mutable state lives here and is only changed by the store actions in
/// [`crate::services`].
pub struct AppState {
    config: AppConfig,
    services: Services,
    http: reqwest::Client,
    root: RwLock<RootState>,
    hotkeys: RwLock<HotkeyModuleState>,
    sse: SseState,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// `host` must be the hub the services forward host requests to, so that the
    /// host SSE route and the services talk over the same channel.
    pub fn new(config: AppConfig, services: Services, host: SseHub) -> SharedState {
        let root = RootState {
            urls: config.urls_for(false, false),
            ..RootState::default()
        };

        Arc::new(Self {
            config,
            services,
            http: reqwest::Client::new(),
            root: RwLock::new(root),
            hotkeys: RwLock::new(HotkeyModuleState::default()),
            sse: SseState::new(SseHub::new(UI_SSE_CAPACITY), host),
        })
    }

    /// Configuration loaded at startup.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// External capabilities.
    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Client used for calls the store makes itself (news).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Root state of the store.
    pub fn root(&self) -> &RwLock<RootState> {
        &self.root
    }

    /// Hotkey sub-state of the store.
    pub fn hotkeys(&self) -> &RwLock<HotkeyModuleState> {
        &self.hotkeys
    }

    /// Broadcast hub used for the renderer SSE stream.
    pub fn ui_sse(&self) -> &SseHub {
        self.sse.ui()
    }

    /// Broadcast hub used for the host SSE stream.
    pub fn host_sse(&self) -> &SseHub {
        self.sse.host()
    }
}
