use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    config::{Endpoint, ServiceUrls},
    state::session::LoginGateway,
};

/// Environment and login information exposed to the renderer.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionSummary {
    /// Test environment selected.
    pub is_test: bool,
    /// Host runs on Windows.
    pub is_windows: bool,
    /// Traffic goes through the China proxy.
    pub is_china_proxy_enabled: bool,
    /// Endpoint picked by the last successful init.
    pub selected_endpoint: Option<Endpoint>,
    /// Service URLs for the current mode.
    pub urls: ServiceUrls,
    /// Battle tag of the logged in player, if any.
    pub battle_tag: Option<String>,
    /// Selected gateway.
    pub gateway: LoginGateway,
}

/// OAuth code returned by the identification redirect.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AuthorizeRequest {
    /// Code from the OAuth redirect.
    #[validate(length(min = 1, max = 512))]
    pub code: String,
}

/// Login gateway to use for the next authorization.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginGatewayRequest {
    /// Gateway chosen on the login screen.
    pub gateway: LoginGateway,
}

/// Toggle used for both test mode and the China proxy.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ModeRequest {
    /// New value of the flag.
    pub enabled: bool,
}

/// Logout options.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ResetAuthenticationRequest {
    /// Ask the host to open the login window again after logging out.
    #[serde(default = "default_request_relogin")]
    pub request_relogin: bool,
}

impl Default for ResetAuthenticationRequest {
    fn default() -> Self {
        Self {
            request_relogin: default_request_relogin(),
        }
    }
}

fn default_request_relogin() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_code_is_rejected() {
        let request = AuthorizeRequest { code: String::new() };
        assert!(request.validate().is_err());

        let request = AuthorizeRequest { code: "abc".into() };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn relogin_defaults_to_true() {
        let request: ResetAuthenticationRequest = serde_json::from_str("{}").unwrap();
        assert!(request.request_relogin);

        let request: ResetAuthenticationRequest =
            serde_json::from_str(r#"{"request_relogin":false}"#).unwrap();
        assert!(!request.request_relogin);
    }

    #[test]
    fn gateway_uses_snake_case() {
        let request: LoginGatewayRequest =
            serde_json::from_str(r#"{"gateway":"america"}"#).unwrap();
        assert_eq!(request.gateway, LoginGateway::America);
    }
}
