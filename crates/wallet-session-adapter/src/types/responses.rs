/*
[INPUT]:  Gateway schema definitions and serde requirements
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for backend communication
[UPDATE]: When API schema changes or new types added
*/

use serde::Deserialize;

use crate::auth::{AuthResult, Secret};

/// Response from POST /auth/refresh
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access_token: Secret,
    #[serde(default)]
    pub refresh_token: Option<Secret>,
    pub expires_in: u64,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub org_id: Option<String>,
}

impl RefreshResponse {
    pub fn auth_result(&self) -> AuthResult {
        AuthResult {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            expires_in: self.expires_in,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransactionReceipt {
    #[serde(rename = "transactionHash")]
    pub transaction_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExecuteOutcome {
    pub result: TransactionReceipt,
}

/// Response from POST /execute/session: `{result:{result:{transactionHash}}}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExecuteResponse {
    pub result: ExecuteOutcome,
}

impl ExecuteResponse {
    pub fn transaction_hash(self) -> String {
        self.result.result.transaction_hash
    }
}

/// Response from POST /execute/session/swap: `{result:{transactionHash}}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SwapResponse {
    pub result: TransactionReceipt,
}

impl SwapResponse {
    pub fn transaction_hash(self) -> String {
        self.result.transaction_hash
    }
}

/// Response from GET /auth/{provider}
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUrlResponse {
    pub url: String,
}
