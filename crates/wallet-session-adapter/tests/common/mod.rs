/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for wallet-session-adapter tests

use wallet_session_adapter::{
    AuthResult, GatewayClient, Secret, SessionConfig, WalletSession,
};
use wiremock::MockServer;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

/// Setup a mock HTTP server for testing
#[allow(dead_code)]
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Gateway client pointed at the mock server
#[allow(dead_code)]
pub fn gateway_client(server: &MockServer) -> GatewayClient {
    GatewayClient::new(&server.uri()).expect("client init")
}

/// Session config used across tests
#[allow(dead_code)]
pub fn session_config() -> SessionConfig {
    let mut config = SessionConfig::new("0xwallet", "sepolia");
    config.email = Some("a@b.com".to_string());
    config.user_id = Some("u1".to_string());
    config.org_id = Some("org-1".to_string());
    config.org_credential = Some(Secret::new("org-secret"));
    config
}

/// Session holding `access`/`refresh`; `expires_in == 0` yields an expired token
#[allow(dead_code)]
pub async fn session_with_tokens(
    client: GatewayClient,
    access: &str,
    refresh: &str,
    expires_in: u64,
) -> WalletSession {
    let session = WalletSession::new(client, session_config());
    session
        .set_tokens(&AuthResult {
            access_token: Secret::new(access),
            refresh_token: Some(Secret::new(refresh)),
            expires_in,
        })
        .await
        .expect("set tokens");
    session
}

/// Mount a refresh endpoint that trades `from` for `access`/`to`
#[allow(dead_code)]
pub async fn mount_refresh(server: &MockServer, from: &str, access: &str, to: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(serde_json::json!({"refresh_token": from})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": access,
            "refresh_token": to,
            "expires_in": 3600,
            "user_id": "u1",
            "email": "a@b.com",
            "org_id": "org-1",
        })))
        .up_to_n_times(times)
        .expect(times)
        .mount(server)
        .await;
}

/// Execute response carrying `hash`
#[allow(dead_code)]
pub fn execute_ok(hash: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "result": {"result": {"transactionHash": hash}},
    }))
}

/// Callback URL with an encoded `user_data` payload
#[allow(dead_code)]
pub fn callback_url(redirect_uri: &str, payload: &serde_json::Value) -> String {
    let encoded: String =
        url::form_urlencoded::byte_serialize(payload.to_string().as_bytes()).collect();
    format!("{redirect_uri}?user_data={encoded}")
}
