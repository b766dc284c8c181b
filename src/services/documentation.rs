use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI document of the companion state service.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::session::get_session,
        crate::routes::session::init,
        crate::routes::session::set_test_mode,
        crate::routes::session::set_china_proxy,
        crate::routes::session::set_login_gateway,
        crate::routes::session::authorize,
        crate::routes::session::reset_authentication,
        crate::routes::news::get_news,
        crate::routes::news::reload_news,
        crate::routes::hotkeys::get_hotkeys,
        crate::routes::hotkeys::add_hot_key,
        crate::routes::hotkeys::set_toggle_combo,
        crate::routes::hotkeys::toggle_hot_keys,
        crate::routes::hotkeys::enable_hot_keys,
        crate::routes::hotkeys::disable_hot_keys,
        crate::routes::hotkeys::apply_input,
        crate::routes::hotkeys::enter_game,
        crate::routes::hotkeys::exit_game,
        crate::routes::hotkeys::save_last_w3c_port,
        crate::routes::status::get_status,
        crate::routes::status::status_socket,
        crate::routes::sse::ui_stream,
        crate::routes::sse::host_stream,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::session::SessionSummary,
            crate::dto::session::AuthorizeRequest,
            crate::dto::session::LoginGatewayRequest,
            crate::dto::session::ModeRequest,
            crate::dto::session::ResetAuthenticationRequest,
            crate::dto::hotkeys::ClickCombinationInput,
            crate::dto::hotkeys::HotKeyInput,
            crate::dto::hotkeys::HotkeyInputRequest,
            crate::dto::hotkeys::PortRequest,
            crate::dto::hotkeys::HotkeysSummary,
            crate::dto::sse::StatusChangedEvent,
            crate::dto::sse::HotkeysChangedEvent,
            crate::dto::sse::SessionChangedEvent,
            crate::dto::sse::EndpointChangedEvent,
            crate::dto::sse::NewsChangedEvent,
            crate::dto::sse::OAuthRequestedEvent,
            crate::config::Endpoint,
            crate::config::ServiceUrls,
            crate::state::status::GameStatusSnapshot,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "session", description = "Environment, endpoint, news and login"),
        (name = "hotkeys", description = "Item hotkeys and in-game interaction state"),
        (name = "status", description = "Live game status fed by the integration worker"),
        (name = "sse", description = "Server-sent events streams"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in ["/session", "/hotkeys/input", "/ws/status", "/sse/host", "/news"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
