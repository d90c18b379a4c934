/*
[INPUT]:  Provider, network, redirect URI, app id / org credential, browser capability
[OUTPUT]: Wallet session built from the OAuth callback payload
[POS]:    Auth layer - redirect-based login flow
[UPDATE]: When broker endpoints, callback contract or attempt states change
*/

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use url::{Url, form_urlencoded};
use uuid::Uuid;

use crate::http::{GatewayClient, Result, WalletError};
use crate::types::{AuthUrlQuery, CallbackPayload, Provider};

use super::{BiometricGate, Secret, SessionConfig, TokenStore, WalletSession};

const USER_DATA_PARAM: &str = "user_data";

/// Login configuration for one provider
///
/// ```rust,ignore
/// let config = OAuthConfig::new(Provider::Google, "sepolia", "myapp://callback")
///     .with_app_id("my-app-id");
/// ```
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    provider: Provider,
    network: String,
    final_redirect_uri: String,
    app_id: Option<String>,
    org_credential: Option<Secret>,
    rotate_refresh_tokens: bool,
}

impl OAuthConfig {
    #[must_use]
    pub fn new(
        provider: Provider,
        network: impl Into<String>,
        final_redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            network: network.into(),
            final_redirect_uri: final_redirect_uri.into(),
            app_id: None,
            org_credential: None,
            rotate_refresh_tokens: true,
        }
    }

    /// Application id registered with the broker.
    #[must_use]
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Organization secret; authorizes Apple login and token refresh.
    #[must_use]
    pub fn with_org_credential(mut self, credential: Secret) -> Self {
        self.org_credential = Some(credential);
        self
    }

    /// Whether the backend rotates refresh tokens (default: true).
    #[must_use]
    pub fn with_refresh_rotation(mut self, rotate: bool) -> Self {
        self.rotate_refresh_tokens = rotate;
        self
    }

    #[must_use]
    pub fn provider(&self) -> Provider {
        self.provider
    }

    #[must_use]
    pub fn network(&self) -> &str {
        &self.network
    }

    #[must_use]
    pub fn final_redirect_uri(&self) -> &str {
        &self.final_redirect_uri
    }

    #[must_use]
    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }
}

/// How the system browser session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserResult {
    /// Browser reached the redirect URI; `url` is the full callback URL
    Success { url: String },
    /// User closed or backed out of the browser
    Cancel,
    /// Any other platform-specific resolution
    Other(String),
}

/// Trait for the system browser / web-auth session
///
/// The call suspends until the user finishes, so implementations must not hold
/// locks shared with the rest of the host while waiting.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn open_auth_session(&self, auth_url: &Url, redirect_uri: &str) -> Result<BrowserResult>;
}

/// Progress of a single login attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Idle,
    RequestingAuthUrl,
    AwaitingBrowserResult,
    Success,
    Cancelled,
    Failed,
}

impl LoginState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            LoginState::Success | LoginState::Cancelled | LoginState::Failed
        )
    }
}

/// Drives redirect logins against the broker and builds wallet sessions
pub struct OAuthClient {
    client: GatewayClient,
    config: OAuthConfig,
    store: Option<Arc<dyn TokenStore>>,
    biometric: Option<Arc<dyn BiometricGate>>,
}

impl std::fmt::Debug for OAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClient")
            .field("config", &self.config)
            .field("has_token_store", &self.store.is_some())
            .field("has_biometric_gate", &self.biometric.is_some())
            .finish_non_exhaustive()
    }
}

impl OAuthClient {
    pub fn new(client: GatewayClient, config: OAuthConfig) -> Self {
        Self {
            client,
            config,
            store: None,
            biometric: None,
        }
    }

    /// Attach and seed `store` on every session this client creates
    #[must_use]
    pub fn with_token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Attach `gate` to every session this client creates
    #[must_use]
    pub fn with_biometric_gate(mut self, gate: Arc<dyn BiometricGate>) -> Self {
        self.biometric = Some(gate);
        self
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Start a new attempt in `Idle`
    pub fn begin(&self) -> LoginAttempt<'_> {
        LoginAttempt {
            oauth: self,
            attempt_id: Uuid::new_v4(),
            state: LoginState::Idle,
        }
    }

    /// Run a full login attempt
    pub async fn login(&self, browser: &dyn BrowserSession) -> Result<WalletSession> {
        self.begin().run(browser).await
    }

    /// Run a login attempt and report through exactly one of the callbacks
    pub async fn login_with_callbacks<S, E>(
        &self,
        browser: &dyn BrowserSession,
        on_success: S,
        on_error: E,
    ) where
        S: FnOnce(WalletSession),
        E: FnOnce(WalletError),
    {
        match self.login(browser).await {
            Ok(session) => on_success(session),
            Err(err) => on_error(err),
        }
    }

    /// Ask the broker where to send the user
    pub async fn authorization_url(&self) -> Result<Url> {
        let config = &self.config;
        let credential = match config.provider {
            Provider::Google => {
                if config.app_id.is_none() {
                    return Err(WalletError::Config(
                        "Google login requires an app_id".to_string(),
                    ));
                }
                None
            }
            Provider::Apple => {
                if config.app_id.is_none() && config.org_credential.is_none() {
                    return Err(WalletError::Config(
                        "Apple login requires an app_id or an org credential".to_string(),
                    ));
                }
                config.org_credential.as_ref()
            }
        };

        let query = AuthUrlQuery {
            network: &config.network,
            final_redirect_uri: &config.final_redirect_uri,
            app_id: config.app_id.as_deref(),
        };
        self.client
            .fetch_authorization_url(config.provider, &query, credential)
            .await
    }

    /// Finish a login from a callback URL the host received itself
    pub async fn complete_callback(&self, callback_url: &str) -> Result<WalletSession> {
        let payload = parse_callback_url(callback_url)?;
        self.session_from_payload(&payload).await
    }

    /// Build a session from a decoded callback payload, seeding its tokens
    pub async fn session_from_payload(&self, payload: &CallbackPayload) -> Result<WalletSession> {
        let config = SessionConfig {
            address: payload.wallet.address.clone(),
            network: payload.wallet.network.clone(),
            email: Some(payload.email.clone()),
            user_id: Some(payload.user_id.clone()),
            org_id: payload.org_id.clone(),
            org_credential: self.config.org_credential.clone(),
            rotate_refresh_tokens: self.config.rotate_refresh_tokens,
        };

        let mut session = WalletSession::new(self.client.clone(), config);
        if let Some(store) = &self.store {
            session = session.with_token_store(store.clone());
        }
        if let Some(gate) = &self.biometric {
            session = session.with_biometric_gate(gate.clone());
        }

        match &payload.auth_data {
            Some(auth_data) => session.set_tokens(&auth_data.auth_result()).await?,
            None => {
                // The shared record may still hold another account's tokens.
                session.clear_tokens().await?;
                warn!(
                    address = %payload.wallet.address,
                    "callback payload carried no auth data; session starts unauthenticated"
                );
            }
        }
        Ok(session)
    }
}

/// One login attempt; terminal states are final
#[derive(Debug)]
pub struct LoginAttempt<'a> {
    oauth: &'a OAuthClient,
    attempt_id: Uuid,
    state: LoginState,
}

impl LoginAttempt<'_> {
    pub fn id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn state(&self) -> LoginState {
        self.state
    }

    /// Request the auth URL, wait for the browser, then build the session
    pub async fn run(&mut self, browser: &dyn BrowserSession) -> Result<WalletSession> {
        if self.state != LoginState::Idle {
            return Err(WalletError::Config(format!(
                "login attempt {} already ran; start a new attempt",
                self.attempt_id
            )));
        }

        let result = self.drive(browser).await;
        let terminal = match &result {
            Ok(_) => LoginState::Success,
            Err(WalletError::UserCancelled) => LoginState::Cancelled,
            Err(_) => LoginState::Failed,
        };
        self.transition(terminal);
        if let Err(err) = &result {
            warn!(attempt_id = %self.attempt_id, error = %err, "oauth login did not complete");
        }
        result
    }

    async fn drive(&mut self, browser: &dyn BrowserSession) -> Result<WalletSession> {
        self.transition(LoginState::RequestingAuthUrl);
        let auth_url = self
            .oauth
            .authorization_url()
            .await
            .map_err(|err| err.in_operation("Failed to get authorization URL"))?;

        self.transition(LoginState::AwaitingBrowserResult);
        let outcome = browser
            .open_auth_session(&auth_url, self.oauth.config.final_redirect_uri())
            .await?;

        match outcome {
            BrowserResult::Success { url } => self.oauth.complete_callback(&url).await,
            BrowserResult::Cancel => Err(WalletError::UserCancelled),
            BrowserResult::Other(kind) => {
                warn!(attempt_id = %self.attempt_id, kind = %kind, "unexpected browser result");
                Err(WalletError::AuthFailed)
            }
        }
    }

    fn transition(&mut self, next: LoginState) {
        info!(
            attempt_id = %self.attempt_id,
            provider = %self.oauth.config.provider,
            from = ?self.state,
            to = ?next,
            "oauth login state"
        );
        self.state = next;
    }
}

/// Extract and decode the `user_data` payload of a callback URL.
///
/// Query parameters are searched before fragment parameters.
pub fn parse_callback_url(callback_url: &str) -> Result<CallbackPayload> {
    let url = Url::parse(callback_url.trim())
        .map_err(|err| malformed(format!("Invalid callback URL: {err}"), None))?;

    let query = url.query().unwrap_or_default();
    let fragment = url.fragment().unwrap_or_default();
    let user_data = form_urlencoded::parse(query.as_bytes())
        .chain(form_urlencoded::parse(fragment.as_bytes()))
        .find(|(key, _)| key == USER_DATA_PARAM)
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| malformed("No user data received".to_string(), None))?;

    match serde_json::from_str(&user_data) {
        Ok(payload) => Ok(payload),
        Err(err) => Err(malformed(
            format!("Failed to parse user data: {err}"),
            Some(Secret::new(user_data)),
        )),
    }
}

fn malformed(reason: String, raw: Option<Secret>) -> WalletError {
    WalletError::CallbackMalformed { reason, raw }
}
