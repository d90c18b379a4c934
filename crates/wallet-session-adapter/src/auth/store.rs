/*
[INPUT]:  Token state and a storage location
[OUTPUT]: Persisted token record (load / save / delete)
[POS]:    Auth layer - secure persistence for session tokens
[UPDATE]: When record format or file naming conventions change
*/

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::http::{Result, WalletError};

use super::TokenState;

/// Name of the single record holding a session's tokens
pub const TOKEN_RECORD_NAME: &str = "wallet_session_tokens";

/// Secure storage capability for one serialized `TokenState` record.
///
/// Implement this over the platform keychain/keystore in a host application.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read the record; `None` when nothing is stored
    async fn load(&self) -> Result<Option<TokenState>>;

    /// Replace the record
    async fn save(&self, state: &TokenState) -> Result<()>;

    /// Remove the record; removing a missing record is not an error
    async fn delete(&self) -> Result<()>;
}

/// File-backed store: one base64 JSON file, owner read/write only
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    dir: PathBuf,
    record: String,
}

impl FileTokenStore {
    /// Create a store writing `TOKEN_RECORD_NAME` under `dir`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_record(dir, TOKEN_RECORD_NAME)
    }

    /// Create a store with an explicit record name (one per account)
    pub fn with_record(dir: impl AsRef<Path>, record: impl Into<String>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            record: record.into(),
        }
    }

    /// Get the file path for the record
    pub fn record_path(&self) -> PathBuf {
        self.dir.join(format!("{}.token", self.record))
    }

    fn staging_path(&self) -> PathBuf {
        self.dir.join(format!("{}.token.tmp", self.record))
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<TokenState>> {
        let path = self.record_path();
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(storage_error("read", &path, err)),
        };

        let bytes = STANDARD
            .decode(content.trim())
            .map_err(|e| WalletError::Storage(format!("token record is not valid base64: {e}")))?;
        let state = serde_json::from_slice(&bytes)
            .map_err(|e| WalletError::Storage(format!("token record is not valid JSON: {e}")))?;
        Ok(Some(state))
    }

    async fn save(&self, state: &TokenState) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| storage_error("create", &self.dir, e))?;

        let json = serde_json::to_vec(state)?;
        let encoded = STANDARD.encode(json);

        // Write a private temp file, then rename over the record.
        let path = self.record_path();
        let staging = self.staging_path();
        match fs::remove_file(&staging).await {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(storage_error("clear", &staging, err)),
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options
            .open(&staging)
            .await
            .map_err(|e| storage_error("create", &staging, e))?;
        file.write_all(encoded.as_bytes())
            .await
            .map_err(|e| storage_error("write", &staging, e))?;
        file.sync_all()
            .await
            .map_err(|e| storage_error("sync", &staging, e))?;
        drop(file);

        fs::rename(&staging, &path)
            .await
            .map_err(|e| storage_error("replace", &path, e))?;

        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        let path = self.record_path();
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_error("delete", &path, err)),
        }
    }
}

fn storage_error(action: &str, path: &Path, err: std::io::Error) -> WalletError {
    WalletError::Storage(format!("failed to {action} {}: {err}", path.display()))
}

/// In-process store for tests and hosts without secure storage
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    record: Mutex<Option<TokenState>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the record
    pub fn with_state(state: TokenState) -> Self {
        Self {
            record: Mutex::new(Some(state)),
        }
    }

    /// Current record contents
    pub fn snapshot(&self) -> Option<TokenState> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<TokenState>> {
        self.record.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<TokenState>> {
        Ok(self.lock().clone())
    }

    async fn save(&self, state: &TokenState) -> Result<()> {
        *self.lock() = Some(state.clone());
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        *self.lock() = None;
        Ok(())
    }
}
