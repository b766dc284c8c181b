//! Application-level configuration loading: service URL sets, candidate endpoints and
//! local paths.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

/// Default location on disk where the daemon looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/companion.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "W3C_COMPANION_CONFIG_PATH";
/// Default location of the persisted user settings.
const DEFAULT_SETTINGS_PATH: &str = "config/settings.json";
const DEFAULT_PORT: u16 = 8787;

/// URLs of the backend services used for one environment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct ServiceUrls {
    /// Base URL of the update service.
    pub update_url: String,
    /// Base URL of the website backend serving news.
    pub news_url: String,
    /// Base URL of the identification (OAuth) service.
    pub identification_url: String,
    /// Key the identification service signs tokens with.
    #[serde(default)]
    pub identification_public_key: String,
}

/// A backend location the endpoint selector can pick from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Endpoint {
    /// Display name (e.g. "Europe").
    pub name: String,
    /// URL pinged when racing endpoints against each other.
    pub ping_url: String,
    pub update_url: String,
    pub news_url: String,
    pub identification_url: String,
    #[serde(default)]
    pub identification_public_key: String,
    /// When set, updates are downloaded from here instead of through the updater.
    #[serde(default)]
    pub override_update_file_download_url: Option<String>,
    /// Whether this endpoint belongs to the test environment.
    #[serde(default)]
    pub test: bool,
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    port: u16,
    oauth_enabled: bool,
    settings_path: PathBuf,
    prod: ServiceUrls,
    test: ServiceUrls,
    china: ServiceUrls,
    endpoints: Vec<Endpoint>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        endpoints = app_config.endpoints.len(),
                        "loaded companion config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Port the HTTP surface listens on. `PORT` in the environment wins.
    pub fn port(&self) -> u16 {
        env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(self.port)
    }

    /// Whether a logout should ask the host to start a new OAuth flow.
    pub fn oauth_enabled(&self) -> bool {
        self.oauth_enabled
    }

    /// File the local services persist user settings to.
    pub fn settings_path(&self) -> &PathBuf {
        &self.settings_path
    }

    /// Candidate endpoints for the given environment.
    pub fn endpoints(&self, is_test: bool) -> Vec<Endpoint> {
        self.endpoints
            .iter()
            .filter(|endpoint| endpoint.test == is_test)
            .cloned()
            .collect()
    }

    /// Resolve the URL set for the current mode.
    ///
    /// The China proxy only exists for production, so it wins over the test flag
    /// for every URL except the public key, which is always the production one.
    pub fn urls_for(&self, is_test: bool, china_proxy: bool) -> ServiceUrls {
        if china_proxy {
            return ServiceUrls {
                identification_public_key: self.prod.identification_public_key.clone(),
                ..self.china.clone()
            };
        }

        if is_test {
            self.test.clone()
        } else {
            self.prod.clone()
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let prod = default_urls("");
        let test = default_urls(".test");
        Self {
            port: DEFAULT_PORT,
            oauth_enabled: true,
            settings_path: PathBuf::from(DEFAULT_SETTINGS_PATH),
            endpoints: vec![default_endpoint("Default", &prod, false), default_endpoint("Test", &test, true)],
            china: ServiceUrls {
                update_url: "https://update-service.w3champions.cn/".into(),
                news_url: "https://website-backend.w3champions.cn/".into(),
                identification_url: "https://identification-service.w3champions.cn/".into(),
                identification_public_key: String::new(),
            },
            prod,
            test,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    oauth_enabled: Option<bool>,
    #[serde(default)]
    settings_path: Option<PathBuf>,
    #[serde(default)]
    prod: Option<ServiceUrls>,
    #[serde(default)]
    test: Option<ServiceUrls>,
    #[serde(default)]
    china: Option<ServiceUrls>,
    #[serde(default)]
    endpoints: Vec<Endpoint>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        let prod = value.prod.unwrap_or(defaults.prod);
        let test = value.test.unwrap_or(defaults.test);
        let endpoints = if value.endpoints.is_empty() {
            vec![default_endpoint("Default", &prod, false), default_endpoint("Test", &test, true)]
        } else {
            value.endpoints
        };

        Self {
            port: value.port.unwrap_or(defaults.port),
            oauth_enabled: value.oauth_enabled.unwrap_or(defaults.oauth_enabled),
            settings_path: value.settings_path.unwrap_or(defaults.settings_path),
            china: value.china.unwrap_or(defaults.china),
            endpoints,
            prod,
            test,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn default_urls(environment: &str) -> ServiceUrls {
    ServiceUrls {
        update_url: format!("https://update-service{environment}.w3champions.com/"),
        news_url: format!("https://website-backend{environment}.w3champions.com/"),
        identification_url: format!("https://identification-service{environment}.w3champions.com/"),
        identification_public_key: String::new(),
    }
}

fn default_endpoint(name: &str, urls: &ServiceUrls, test: bool) -> Endpoint {
    Endpoint {
        name: name.into(),
        ping_url: urls.update_url.clone(),
        update_url: urls.update_url.clone(),
        news_url: urls.news_url.clone(),
        identification_url: urls.identification_url.clone(),
        identification_public_key: urls.identification_public_key.clone(),
        override_update_file_download_url: None,
        test,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        serde_json::from_str::<RawConfig>(
            r#"{
                "oauth_enabled": false,
                "prod": { "update_url": "https://u/", "news_url": "https://n/",
                          "identification_url": "https://i/", "identification_public_key": "PROD" },
                "test": { "update_url": "https://tu/", "news_url": "https://tn/",
                          "identification_url": "https://ti/", "identification_public_key": "TEST" },
                "china": { "update_url": "https://cu/", "news_url": "https://cn/",
                           "identification_url": "https://ci/" }
            }"#,
        )
        .unwrap()
        .into()
    }

    #[test]
    fn china_proxy_uses_china_urls_with_prod_key() {
        let urls = config().urls_for(true, true);
        assert_eq!(urls.news_url, "https://cn/");
        assert_eq!(urls.identification_public_key, "PROD");
    }

    #[test]
    fn test_mode_without_proxy_uses_test_urls() {
        let urls = config().urls_for(true, false);
        assert_eq!(urls.update_url, "https://tu/");
        assert_eq!(urls.identification_public_key, "TEST");
        assert_eq!(config().urls_for(false, false).news_url, "https://n/");
    }

    #[test]
    fn missing_endpoints_are_derived_from_url_sets() {
        let config = config();
        assert!(!config.oauth_enabled());

        let prod = config.endpoints(false);
        assert_eq!(prod.len(), 1);
        assert_eq!(prod[0].news_url, "https://n/");
        let test = config.endpoints(true);
        assert_eq!(test[0].identification_url, "https://ti/");
    }
}
