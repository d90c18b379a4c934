/*
[INPUT]:  Session identity, gateway client, token store and biometric gate
[OUTPUT]: Authenticated wallet operations (execute, batch execute, swap)
[POS]:    Auth layer - token lifecycle and authenticated operation wrapper
[UPDATE]: When operation pre-flight steps or refresh rules change
*/

use std::future::Future;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::http::{BiometricFailure, GatewayClient, Result, WalletError};
use crate::types::{Call, ExecuteRequest, SwapRequest};

use super::biometric::{BiometricGate, require_confirmation};
use super::{AuthResult, Secret, TokenState, TokenStore};

const BIOMETRIC_PROMPT: &str = "Confirm wallet transaction";

const EXECUTE_CONTEXT: &str = "Error executing calls";
const SWAP_CONTEXT: &str = "Error executing swap";

/// Named construction parameters for a wallet session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub address: String,
    pub network: String,
    pub email: Option<String>,
    pub user_id: Option<String>,
    pub org_id: Option<String>,
    /// Bearer credential for the refresh endpoint
    pub org_credential: Option<Secret>,
    /// Backend rotates refresh tokens on every exchange
    pub rotate_refresh_tokens: bool,
}

impl SessionConfig {
    pub fn new(address: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            network: network.into(),
            email: None,
            user_id: None,
            org_id: None,
            org_credential: None,
            rotate_refresh_tokens: true,
        }
    }
}

/// Immutable identity of a session; carries no secrets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub address: String,
    pub network: String,
    pub email: Option<String>,
    pub user_id: Option<String>,
    pub org_id: Option<String>,
}

/// Wallet bound to one authenticated user.
///
/// Owns its token state; refreshes are serialized so a rotated refresh token
/// is never presented twice.
pub struct WalletSession {
    identity: SessionIdentity,
    org_credential: Option<Secret>,
    rotate_refresh_tokens: bool,
    client: GatewayClient,
    tokens: Mutex<TokenState>,
    store: Option<Arc<dyn TokenStore>>,
    biometric: Option<Arc<dyn BiometricGate>>,
}

impl std::fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSession")
            .field("identity", &self.identity)
            .field("rotate_refresh_tokens", &self.rotate_refresh_tokens)
            .field("has_token_store", &self.store.is_some())
            .field("has_biometric_gate", &self.biometric.is_some())
            .finish_non_exhaustive()
    }
}

impl WalletSession {
    /// Create a session with identity only; hydrate tokens afterwards
    pub fn new(client: GatewayClient, config: SessionConfig) -> Self {
        Self {
            identity: SessionIdentity {
                address: config.address,
                network: config.network,
                email: config.email,
                user_id: config.user_id,
                org_id: config.org_id,
            },
            org_credential: config.org_credential,
            rotate_refresh_tokens: config.rotate_refresh_tokens,
            client,
            tokens: Mutex::new(TokenState::new()),
            store: None,
            biometric: None,
        }
    }

    /// Seed the in-memory token state at construction time
    pub fn with_tokens(mut self, tokens: TokenState) -> Self {
        *self.tokens.get_mut() = tokens;
        self
    }

    /// Persist token changes to `store` and hydrate from it
    pub fn with_token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Use `gate` for operations that request biometric confirmation
    pub fn with_biometric_gate(mut self, gate: Arc<dyn BiometricGate>) -> Self {
        self.biometric = Some(gate);
        self
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    pub fn address(&self) -> &str {
        &self.identity.address
    }

    pub fn network(&self) -> &str {
        &self.identity.network
    }

    /// Snapshot of the current token state
    pub async fn token_state(&self) -> TokenState {
        self.tokens.lock().await.clone()
    }

    /// Replace tokens with a login result and persist them
    pub async fn set_tokens(&self, result: &AuthResult) -> Result<()> {
        let mut tokens = self.tokens.lock().await;
        tokens.clear();
        tokens.set_from_auth_result(result);
        if let Some(store) = &self.store {
            store.save(&tokens).await?;
        }
        Ok(())
    }

    /// Load tokens from the store into memory.
    ///
    /// Returns `false` when there is no store or no stored record.
    pub async fn load_tokens(&self) -> Result<bool> {
        let Some(store) = &self.store else {
            return Ok(false);
        };
        let mut tokens = self.tokens.lock().await;
        match store.load().await? {
            Some(stored) => {
                *tokens = stored;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Check for a usable access token, falling back to the store
    pub async fn is_authenticated(&self) -> bool {
        let mut tokens = self.tokens.lock().await;
        if !tokens.is_expired() {
            return true;
        }
        let Some(store) = &self.store else {
            return false;
        };
        match store.load().await {
            Ok(Some(stored)) if !stored.is_expired() => {
                *tokens = stored;
                true
            }
            Ok(_) => false,
            Err(err) => {
                warn!(error = %err, "failed to load stored token state");
                false
            }
        }
    }

    /// Refresh the access token now, regardless of expiry
    pub async fn refresh(&self) -> Result<()> {
        let mut tokens = self.tokens.lock().await;
        self.refresh_locked(&mut tokens)
            .await
            .map_err(|err| err.in_operation("Error refreshing token"))
    }

    /// Current access token, refreshed first if it is expired
    pub async fn access_token(&self) -> Result<Secret> {
        let mut tokens = self.tokens.lock().await;
        if !tokens.is_expired() {
            if let Some(token) = tokens.access_token() {
                return Ok(token.clone());
            }
        }
        self.refresh_for_operation(&mut tokens).await
    }

    /// Execute one contract call
    pub async fn execute(&self, call: Call, bio_auth: bool) -> Result<String> {
        self.execute_calls(vec![call], bio_auth).await
    }

    /// Execute a batch of contract calls in one transaction
    pub async fn execute_calls(&self, calls: Vec<Call>, bio_auth: bool) -> Result<String> {
        if calls.is_empty() {
            return Err(WalletError::Config(
                "execute requires at least one call".to_string(),
            ));
        }

        let request = ExecuteRequest {
            address: self.identity.address.clone(),
            org_id: self.identity.org_id.clone(),
            calls,
            network: self.identity.network.clone(),
        };
        let client = &self.client;
        let request = &request;

        self.run_authenticated(EXECUTE_CONTEXT, bio_auth, move |token| async move {
            client.execute_calls(&token, request).await
        })
        .await
    }

    /// Swap `amount` of `sell_token` for `buy_token`
    pub async fn swap(
        &self,
        amount: Decimal,
        sell_token: &str,
        buy_token: &str,
        bio_auth: bool,
    ) -> Result<String> {
        let request = SwapRequest {
            address: self.identity.address.clone(),
            org_id: self.identity.org_id.clone(),
            network: self.identity.network.clone(),
            amount,
            sell_token_address: sell_token.to_string(),
            buy_token_address: buy_token.to_string(),
        };
        let client = &self.client;
        let request = &request;

        self.run_authenticated(SWAP_CONTEXT, bio_auth, move |token| async move {
            client.swap(&token, request).await
        })
        .await
    }

    /// Drop all tokens in memory and in the store
    pub async fn logout(&self) -> Result<()> {
        self.clear_tokens().await?;
        info!(address = %self.identity.address, "wallet session logged out");
        Ok(())
    }

    /// Forget tokens without ending the session; the store record is removed too
    pub async fn clear_tokens(&self) -> Result<()> {
        let mut tokens = self.tokens.lock().await;
        tokens.clear();
        if let Some(store) = &self.store {
            store.delete().await?;
        }
        Ok(())
    }

    /// Biometric gate, then a valid token, then dispatch.
    ///
    /// A 401 on dispatch triggers one refresh and one retry.
    async fn run_authenticated<F, Fut>(
        &self,
        context: &'static str,
        bio_auth: bool,
        dispatch: F,
    ) -> Result<String>
    where
        F: Fn(Secret) -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        if bio_auth {
            self.confirm_biometrics().await?;
        }

        let token = self.access_token().await?;
        match dispatch(token.clone()).await {
            Err(err) if err.status() == Some(401) => {
                debug!(context, "access token rejected by gateway");
                let token = self.refresh_after_rejection(&token).await?;
                dispatch(token).await.map_err(|err| err.in_operation(context))
            }
            result => result.map_err(|err| err.in_operation(context)),
        }
    }

    async fn confirm_biometrics(&self) -> Result<()> {
        match &self.biometric {
            Some(gate) => require_confirmation(gate.as_ref(), BIOMETRIC_PROMPT).await,
            None => Err(WalletError::BiometricDenied(BiometricFailure::Unavailable)),
        }
    }

    /// Refresh unless another caller already replaced the rejected token
    async fn refresh_after_rejection(&self, rejected: &Secret) -> Result<Secret> {
        let mut tokens = self.tokens.lock().await;
        if let Some(current) = tokens.access_token() {
            if current != rejected && !tokens.is_expired() {
                return Ok(current.clone());
            }
        }
        self.refresh_for_operation(&mut tokens).await
    }

    async fn refresh_for_operation(&self, tokens: &mut TokenState) -> Result<Secret> {
        if let Err(err) = self.refresh_locked(tokens).await {
            warn!(
                address = %self.identity.address,
                error = %err,
                "token refresh failed"
            );
            return Err(WalletError::AuthRequired);
        }
        tokens.access_token().cloned().ok_or(WalletError::AuthRequired)
    }

    /// Exchange the refresh token; caller holds the token lock
    async fn refresh_locked(&self, tokens: &mut TokenState) -> Result<()> {
        let refresh_token = tokens
            .refresh_token()
            .cloned()
            .ok_or(WalletError::AuthRequired)?;

        info!(address = %self.identity.address, "refreshing access token");
        let response = self
            .client
            .refresh(&refresh_token, self.org_credential.as_ref())
            .await?;

        if let (Some(own), Some(theirs)) = (&self.identity.org_id, &response.org_id) {
            if own != theirs {
                warn!(org_id = %own, response_org_id = %theirs, "refresh response names another org");
            }
        }

        let mut result = response.auth_result();
        if self.rotate_refresh_tokens {
            let rotated = result
                .refresh_token
                .as_ref()
                .is_some_and(|next| *next != refresh_token);
            if !rotated {
                // The old token was consumed server-side either way.
                warn!(address = %self.identity.address, "refresh response did not rotate the refresh token");
                result.refresh_token = None;
                tokens.clear();
            }
        }

        tokens.set_from_auth_result(&result);
        if let Some(store) = &self.store {
            if let Err(err) = store.save(tokens).await {
                warn!(error = %err, "failed to persist refreshed token state");
            }
        }

        info!(address = %self.identity.address, "access token refreshed");
        Ok(())
    }
}
