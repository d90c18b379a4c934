/*
[INPUT]:  JSON embedded in the OAuth callback `user_data` parameter
[OUTPUT]: Typed callback payload with identity, wallet and auth data
[POS]:    Data layer - OAuth callback contract
[UPDATE]: When the broker changes the callback payload shape
*/

use serde::{Deserialize, Serialize};

use crate::auth::{AuthResult, Secret};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletInfo {
    pub address: String,
    pub network: String,
}

/// Token material issued at login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackAuthData {
    pub access_token: Secret,
    #[serde(default)]
    pub refresh_token: Option<Secret>,
    pub expires_in: u64,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CallbackAuthData {
    pub fn auth_result(&self) -> AuthResult {
        AuthResult {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            expires_in: self.expires_in,
        }
    }
}

/// Decoded `user_data` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackPayload {
    pub user_id: String,
    pub email: String,
    pub wallet: WalletInfo,
    #[serde(default)]
    pub org_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(rename = "authData", default)]
    pub auth_data: Option<CallbackAuthData>,
}
