/*
[INPUT]:  Mock broker responses and scripted browser outcomes
[OUTPUT]: Test results for the OAuth redirect flow
[POS]:    Integration tests - login attempts and callback handling
[UPDATE]: When broker endpoints or login states change
*/

mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use common::{callback_url, gateway_client, setup_mock_server};
use tokio_test::assert_ok;
use url::Url;
use wallet_session_adapter::{
    AuthResult, BrowserResult, BrowserSession, LoginState, MemoryTokenStore, OAuthClient,
    OAuthConfig, Provider, Result, Secret, TokenState, WalletError, WalletSession,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REDIRECT_URI: &str = "myapp://callback";
const AUTHORIZE_URL: &str = "https://accounts.example.com/authorize?state=abc";

/// Browser that records what it was asked to open and answers from a script
struct ScriptedBrowser {
    outcome: BrowserResult,
    opened: Mutex<Vec<(String, String)>>,
}

impl ScriptedBrowser {
    fn new(outcome: BrowserResult) -> Self {
        Self {
            outcome,
            opened: Mutex::new(Vec::new()),
        }
    }

    fn opened(&self) -> Vec<(String, String)> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrowserSession for ScriptedBrowser {
    async fn open_auth_session(&self, auth_url: &Url, redirect_uri: &str) -> Result<BrowserResult> {
        self.opened
            .lock()
            .unwrap()
            .push((auth_url.to_string(), redirect_uri.to_string()));
        Ok(self.outcome.clone())
    }
}

fn login_payload() -> serde_json::Value {
    serde_json::json!({
        "user_id": "u1",
        "email": "a@b.com",
        "wallet": {"address": "0x1", "network": "sepolia"},
        "org_id": "org-1",
        "created_at": "2024-01-01T00:00:00Z",
        "authData": {
            "accessToken": "a1",
            "refreshToken": "r1",
            "expiresIn": 3600,
            "timestamp": 1_700_000_000,
        },
    })
}

async fn mount_auth_url(server: &MockServer, provider: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/auth/{provider}")))
        .and(query_param("network", "sepolia"))
        .and(query_param("final_redirect_uri", REDIRECT_URI))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "url": AUTHORIZE_URL,
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn google_client(server: &MockServer) -> OAuthClient {
    let config = OAuthConfig::new(Provider::Google, "sepolia", REDIRECT_URI).with_app_id("app-1");
    OAuthClient::new(gateway_client(server), config)
}

#[tokio::test]
async fn test_google_login_builds_session() {
    let server = setup_mock_server().await;
    mount_auth_url(&server, "google").await;
    let browser = ScriptedBrowser::new(BrowserResult::Success {
        url: callback_url(REDIRECT_URI, &login_payload()),
    });

    let oauth = google_client(&server);
    let mut attempt = oauth.begin();
    assert_eq!(attempt.state(), LoginState::Idle);

    let session = assert_ok!(attempt.run(&browser).await);
    assert_eq!(attempt.state(), LoginState::Success);

    let identity = session.identity();
    assert_eq!(identity.address, "0x1");
    assert_eq!(identity.network, "sepolia");
    assert_eq!(identity.email.as_deref(), Some("a@b.com"));
    assert_eq!(identity.user_id.as_deref(), Some("u1"));
    assert_eq!(identity.org_id.as_deref(), Some("org-1"));
    assert!(session.is_authenticated().await);
    assert_eq!(
        session.token_state().await.refresh_token().map(Secret::expose),
        Some("r1")
    );

    assert_eq!(
        browser.opened(),
        vec![(AUTHORIZE_URL.to_string(), REDIRECT_URI.to_string())]
    );
    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].url.query_pairs().find(|(k, _)| k == "app_id").map(|(_, v)| v.into_owned()),
        Some("app-1".to_string())
    );
}

#[tokio::test]
async fn test_apple_login_uses_org_credential() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/auth/apple"))
        .and(header("authorization", "Bearer org-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "url": AUTHORIZE_URL,
        })))
        .expect(1)
        .mount(&server)
        .await;
    let browser = ScriptedBrowser::new(BrowserResult::Success {
        url: callback_url(REDIRECT_URI, &login_payload()),
    });

    let config = OAuthConfig::new(Provider::Apple, "sepolia", REDIRECT_URI)
        .with_org_credential(Secret::new("org-secret"));
    let oauth = OAuthClient::new(gateway_client(&server), config);

    let session = assert_ok!(oauth.login(&browser).await);
    assert_eq!(session.address(), "0x1");
}

#[tokio::test]
async fn test_cancel_reaches_error_callback_only() {
    let server = setup_mock_server().await;
    mount_auth_url(&server, "google").await;
    let browser = ScriptedBrowser::new(BrowserResult::Cancel);
    let oauth = google_client(&server);

    let mut succeeded: Option<WalletSession> = None;
    let mut failed: Option<WalletError> = None;
    oauth
        .login_with_callbacks(&browser, |s| succeeded = Some(s), |e| failed = Some(e))
        .await;

    assert!(succeeded.is_none());
    let err = failed.expect("error callback should fire");
    assert!(matches!(err, WalletError::UserCancelled));
    assert_eq!(err.to_string(), "Authentication cancelled");
}

#[tokio::test]
async fn test_missing_user_data_reaches_error_callback_only() {
    let server = setup_mock_server().await;
    mount_auth_url(&server, "google").await;
    let browser = ScriptedBrowser::new(BrowserResult::Success {
        url: format!("{REDIRECT_URI}?state=abc"),
    });
    let oauth = google_client(&server);

    let mut succeeded: Option<WalletSession> = None;
    let mut failed: Option<WalletError> = None;
    oauth
        .login_with_callbacks(&browser, |s| succeeded = Some(s), |e| failed = Some(e))
        .await;

    assert!(succeeded.is_none());
    let err = failed.expect("error callback should fire");
    assert!(matches!(err, WalletError::CallbackMalformed { .. }));
    assert_eq!(err.to_string(), "No user data received");
}

#[tokio::test]
async fn test_unknown_browser_result_fails() {
    let server = setup_mock_server().await;
    mount_auth_url(&server, "google").await;
    let browser = ScriptedBrowser::new(BrowserResult::Other("dismiss".to_string()));
    let oauth = google_client(&server);

    let mut attempt = oauth.begin();
    let err = attempt.run(&browser).await.unwrap_err();

    assert_eq!(err.to_string(), "Authentication failed");
    assert_eq!(attempt.state(), LoginState::Failed);
}

#[tokio::test]
async fn test_auth_url_failure_skips_browser() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/auth/google"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&server)
        .await;
    let browser = ScriptedBrowser::new(BrowserResult::Cancel);
    let oauth = google_client(&server);

    let mut attempt = oauth.begin();
    let err = attempt.run(&browser).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Failed to get authorization URL: 503 unavailable"
    );
    assert_eq!(attempt.state(), LoginState::Failed);
    assert!(browser.opened().is_empty());
}

#[tokio::test]
async fn test_non_json_auth_url_response_fails() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/auth/google"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;
    let browser = ScriptedBrowser::new(BrowserResult::Cancel);

    let err = google_client(&server).login(&browser).await.unwrap_err();
    assert!(matches!(err.root(), WalletError::Decode(_)));
    assert!(browser.opened().is_empty());
}

#[tokio::test]
async fn test_attempt_is_single_use() {
    let server = setup_mock_server().await;
    mount_auth_url(&server, "google").await;
    let browser = ScriptedBrowser::new(BrowserResult::Cancel);
    let oauth = google_client(&server);

    let mut attempt = oauth.begin();
    assert!(attempt.run(&browser).await.is_err());
    assert_eq!(attempt.state(), LoginState::Cancelled);

    let err = attempt.run(&browser).await.unwrap_err();
    assert!(matches!(err, WalletError::Config(_)));
    assert_eq!(attempt.state(), LoginState::Cancelled);
    assert_eq!(browser.opened().len(), 1);
}

#[tokio::test]
async fn test_google_requires_app_id() {
    let server = setup_mock_server().await;
    let config = OAuthConfig::new(Provider::Google, "sepolia", REDIRECT_URI);
    let oauth = OAuthClient::new(gateway_client(&server), config);
    let browser = ScriptedBrowser::new(BrowserResult::Cancel);

    let err = oauth.login(&browser).await.unwrap_err();
    assert!(matches!(err.root(), WalletError::Config(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_complete_callback_seeds_store() {
    let server = setup_mock_server().await;
    let store = Arc::new(MemoryTokenStore::new());
    let oauth = google_client(&server).with_token_store(store.clone());

    let session = assert_ok!(
        oauth
            .complete_callback(&callback_url(REDIRECT_URI, &login_payload()))
            .await
    );

    assert!(session.is_authenticated().await);
    let stored = store.snapshot().expect("tokens persisted at login");
    assert_eq!(stored.access_token().map(Secret::expose), Some("a1"));
}

#[tokio::test]
async fn test_callback_without_auth_data_discards_previous_account_tokens() {
    let server = setup_mock_server().await;
    let mut previous = TokenState::new();
    previous.set_from_auth_result(&AuthResult {
        access_token: Secret::new("alice-token"),
        refresh_token: Some(Secret::new("alice-refresh")),
        expires_in: 3600,
    });
    let store = Arc::new(MemoryTokenStore::with_state(previous));
    let oauth = google_client(&server).with_token_store(store.clone());

    let payload = serde_json::json!({
        "user_id": "u2",
        "email": "bob@b.com",
        "wallet": {"address": "0xbob", "network": "sepolia"},
    });
    let session = assert_ok!(oauth.complete_callback(&callback_url(REDIRECT_URI, &payload)).await);

    assert!(store.snapshot().is_none());
    assert!(!session.is_authenticated().await);
    assert!(!assert_ok!(session.load_tokens().await));
    assert!(session.token_state().await.access_token().is_none());
    assert!(matches!(
        session.access_token().await,
        Err(WalletError::AuthRequired)
    ));
}
