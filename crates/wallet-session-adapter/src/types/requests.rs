/*
[INPUT]:  Gateway schema definitions and serde requirements
[OUTPUT]: Typed Rust request structs with serialization support
[POS]:    Data layer - type definitions for backend communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single contract invocation inside an execute batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub contract_address: String,
    pub entry_point: String,
    #[serde(default)]
    pub calldata: Vec<String>,
}

impl Call {
    pub fn new(
        contract_address: impl Into<String>,
        entry_point: impl Into<String>,
        calldata: Vec<String>,
    ) -> Self {
        Self {
            contract_address: contract_address.into(),
            entry_point: entry_point.into(),
            calldata,
        }
    }
}

/// Query of GET /auth/{provider}
#[derive(Debug, Clone, Serialize)]
pub struct AuthUrlQuery<'a> {
    pub network: &'a str,
    pub final_redirect_uri: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<&'a str>,
}

/// POST /auth/refresh
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// POST /execute/session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecuteRequest {
    pub address: String,
    pub org_id: Option<String>,
    pub calls: Vec<Call>,
    pub network: String,
}

/// POST /execute/session/swap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapRequest {
    pub address: String,
    pub org_id: Option<String>,
    pub network: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "sellTokenAddress")]
    pub sell_token_address: String,
    #[serde(rename = "buyTokenAddress")]
    pub buy_token_address: String,
}
