/*
[INPUT]:  YAML configuration file and environment
[OUTPUT]: Parsed host configuration and derived adapter configs
[POS]:    Configuration layer - gateway, provider and storage setup
[UPDATE]: When adding new configuration options
*/

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use wallet_session_adapter::{ClientConfig, OAuthConfig, Provider, Secret};

/// Environment variable consulted when the file carries no org secret
pub const ORG_SECRET_ENV: &str = "WALLET_SESSION_ORG_SECRET";

/// Top-level configuration for the wallet session host
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    /// External API root, e.g. https://services.<provider>/api/v1/external
    pub base_url: String,
    /// Identity provider used by `login`
    pub provider: Provider,
    /// Wallet network (e.g. "sepolia", "mainnet")
    pub network: String,
    /// Redirect URI registered with the broker
    pub redirect_uri: String,
    /// Application id registered with the broker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    /// Organization secret; prefer the environment variable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_secret: Option<String>,
    /// Directory for the profile and token record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Backend rotates refresh tokens
    #[serde(default = "default_rotate_refresh_tokens")]
    pub rotate_refresh_tokens: bool,
    /// HTTP timeouts
    #[serde(default)]
    pub http: HttpConfig,
}

/// HTTP client timeouts in seconds
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_rotate_refresh_tokens() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl CliConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {path}"))?;
        Self::from_yaml(&content)
    }

    /// Parse and validate YAML configuration
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).context("parse config YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(anyhow!("base_url cannot be empty"));
        }
        if self.network.trim().is_empty() {
            return Err(anyhow!("network cannot be empty"));
        }
        if self.redirect_uri.trim().is_empty() {
            return Err(anyhow!("redirect_uri cannot be empty"));
        }
        if self.provider == Provider::Google && self.app_id.is_none() {
            return Err(anyhow!("google login requires app_id"));
        }
        if self.http.timeout_secs == 0 {
            return Err(anyhow!("http.timeout_secs must be positive"));
        }
        Ok(())
    }

    /// Org secret from the file, else from the environment
    pub fn org_secret(&self) -> Option<Secret> {
        self.org_secret
            .clone()
            .or_else(|| std::env::var(ORG_SECRET_ENV).ok())
            .filter(|value| !value.trim().is_empty())
            .map(Secret::new)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.http.timeout_secs),
            connect_timeout: Duration::from_secs(self.http.connect_timeout_secs),
        }
    }

    pub fn oauth_config(&self) -> OAuthConfig {
        let mut config = OAuthConfig::new(self.provider, &self.network, &self.redirect_uri)
            .with_refresh_rotation(self.rotate_refresh_tokens);
        if let Some(app_id) = &self.app_id {
            config = config.with_app_id(app_id);
        }
        if let Some(secret) = self.org_secret() {
            config = config.with_org_credential(secret);
        }
        config
    }

    /// Configured data directory, else the platform data dir
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join("wallet-session"))
            .ok_or_else(|| anyhow!("Could not determine data directory"))
    }
}
