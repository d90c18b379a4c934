/*
[INPUT]:  Loaded CliConfig
[OUTPUT]: Gateway client, token store, profile store and restored sessions
[POS]:    Host wiring - shared by every subcommand
[UPDATE]: When session construction or persistence layout changes
*/

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use wallet_session_adapter::{
    BiometricGate, FileTokenStore, GatewayClient, OAuthClient, SessionConfig, SessionIdentity,
    WalletSession,
};

use crate::config::CliConfig;
use crate::console::ConsoleBiometric;
use crate::profile::ProfileStore;

/// Everything a subcommand needs to reach the backend and local state
#[derive(Clone)]
pub struct SessionHost {
    config: CliConfig,
    client: GatewayClient,
    tokens: Arc<FileTokenStore>,
    profiles: ProfileStore,
    biometric: Arc<dyn BiometricGate>,
}

impl std::fmt::Debug for SessionHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHost")
            .field("base_url", &self.client.base_url().as_str())
            .field("token_record", &self.tokens.record_path())
            .field("profile", &self.profiles.path())
            .finish()
    }
}

impl SessionHost {
    pub fn new(config: CliConfig) -> Result<Self> {
        let client = GatewayClient::with_config(config.client_config(), &config.base_url)
            .context("build gateway client")?;
        let data_dir = config.data_dir()?;
        info!(data_dir = %data_dir.display(), "using data directory");

        Ok(Self {
            tokens: Arc::new(FileTokenStore::new(&data_dir)),
            profiles: ProfileStore::new(&data_dir),
            biometric: Arc::new(ConsoleBiometric::new()),
            config,
            client,
        })
    }

    /// Replace the confirmation prompt (tests, headless hosts)
    pub fn with_biometric_gate(mut self, gate: Arc<dyn BiometricGate>) -> Self {
        self.biometric = gate;
        self
    }

    pub fn config(&self) -> &CliConfig {
        &self.config
    }

    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    pub fn oauth_client(&self) -> OAuthClient {
        OAuthClient::new(self.client.clone(), self.config.oauth_config())
            .with_token_store(self.tokens.clone())
            .with_biometric_gate(self.biometric.clone())
    }

    /// Persist the identity of a freshly logged-in session
    pub async fn remember(&self, session: &WalletSession) -> Result<()> {
        self.profiles
            .save(session.identity())
            .await
            .context("save session profile")
    }

    /// Rebuild the last session from the saved profile and token record
    pub async fn restore(&self) -> Result<WalletSession> {
        let identity = self
            .profiles
            .load()
            .await?
            .context("no saved session; run `wallet-session login` first")?;
        let session = WalletSession::new(self.client.clone(), self.session_config(identity))
            .with_token_store(self.tokens.clone())
            .with_biometric_gate(self.biometric.clone());
        session.load_tokens().await.context("load stored tokens")?;
        Ok(session)
    }

    fn session_config(&self, identity: SessionIdentity) -> SessionConfig {
        let mut config = SessionConfig::new(identity.address, identity.network);
        config.email = identity.email;
        config.user_id = identity.user_id;
        config.org_id = identity.org_id;
        config.org_credential = self.config.org_secret();
        config.rotate_refresh_tokens = self.config.rotate_refresh_tokens;
        config
    }
}
