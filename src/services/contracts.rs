//! Narrow contracts of the external capabilities the store drives.
//!
//! Only the methods the store calls are part of a contract. Implementations own their
//! I/O; the store never looks behind these traits.

use futures::future::BoxFuture;

use crate::{
    config::Endpoint,
    error::ServiceResult,
    state::{
        hotkeys::{ClickCombination, HotKey},
        session::{LoginGateway, W3cToken},
    },
};

/// Triggers the host's updater.
pub trait UpdateService: Send + Sync {
    /// Ask the host to look for and install an update.
    fn check_for_update(&self) -> BoxFuture<'static, ServiceResult<()>>;
}

/// Persists which environment (test or production) and proxy the user chose.
pub trait VersionService: Send + Sync {
    /// Persist the environment choice.
    fn switch_to_mode(&self, is_test: bool) -> BoxFuture<'static, ServiceResult<()>>;
    /// Persisted environment choice, `true` for test.
    fn load_mode(&self) -> bool;
    /// Persist the China proxy flag.
    fn save_is_china_proxy_enabled(&self, enabled: bool) -> BoxFuture<'static, ServiceResult<()>>;
    /// Persisted China proxy flag.
    fn load_is_china_proxy_enabled(&self) -> bool;
}

/// OS facts about the game installation.
pub trait FileService: Send + Sync {
    /// Whether the host runs on Windows.
    fn is_windows(&self) -> bool;
}

/// Registers item hotkeys with the native key hook and persists them.
pub trait ItemHotkeyRegistrationService: Send + Sync {
    /// Register a binding with the key hook.
    fn register_key(&self, hot_key: &HotKey);
    /// Start forwarding bound chords.
    fn enable_hot_keys(&self);
    /// Stop forwarding bound chords.
    fn disable_hot_keys(&self);
    /// Bind the combination that switches hotkeys on and off.
    fn toggle_on_off(&self, combo: &ClickCombination);
    /// Persist the bindings.
    fn save_hot_keys(&self, hot_keys: Vec<HotKey>) -> BoxFuture<'static, ServiceResult<()>>;
    /// Persisted bindings, empty when none were saved.
    fn load_hot_keys(&self) -> Vec<HotKey>;
    /// Persist the game client port.
    fn save_last_w3c_port(&self, port: String) -> BoxFuture<'static, ServiceResult<()>>;
    /// Persisted game client port, empty when unknown.
    fn load_last_w3c_port(&self) -> String;
}

/// Login against the identification service and token persistence.
pub trait AuthenticationService: Send + Sync {
    /// Persisted token, if any.
    fn load_auth_token(&self) -> Option<W3cToken>;
    /// Resolve the user behind `jwt`, `None` when it is not a valid login.
    fn get_user_info(&self, jwt: &str) -> Option<W3cToken>;
    /// Exchange an OAuth `code` for a token, `Ok(None)` when the service refuses it.
    fn authorize(
        &self,
        code: String,
        gateway: LoginGateway,
    ) -> BoxFuture<'static, ServiceResult<Option<W3cToken>>>;
    /// Persist `token`.
    fn save_auth_token(&self, token: W3cToken) -> BoxFuture<'static, ServiceResult<()>>;
    /// Remove the persisted token.
    fn delete_auth_token(&self) -> BoxFuture<'static, ServiceResult<()>>;
    /// Ask the host to open the OAuth login page for `gateway`.
    fn request_login(&self, gateway: LoginGateway);
}

/// Chooses the backend location to talk to.
pub trait EndpointService: Send + Sync {
    /// Race the candidate endpoints of the mode and return the first to answer.
    fn select_fastest_endpoint(&self, is_test: bool) -> BoxFuture<'static, ServiceResult<Endpoint>>;
    /// Endpoint picked by the last successful selection.
    fn selected(&self) -> Option<Endpoint>;
}
