/*
[INPUT]:  Session identity after login
[OUTPUT]: Identity profile persisted next to the token record
[POS]:    Host persistence - non-secret session identity
[UPDATE]: When SessionIdentity fields change
*/

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

use wallet_session_adapter::SessionIdentity;

const PROFILE_FILE: &str = "profile.json";

/// JSON file holding the identity of the last logged-in session.
///
/// Tokens live in the token store; this file never holds secrets.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(PROFILE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Option<SessionIdentity>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("read {}", self.path.display()));
            }
        };
        let identity = serde_json::from_str(&content)
            .with_context(|| format!("parse {}", self.path.display()))?;
        Ok(Some(identity))
    }

    pub async fn save(&self, identity: &SessionIdentity) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(identity).context("serialize profile")?;
        fs::write(&self.path, json)
            .await
            .with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }

    pub async fn delete(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("delete {}", self.path.display())),
        }
    }
}
