/*
[INPUT]:  HTTP client configuration and gateway endpoints
[OUTPUT]: HTTP responses and typed gateway results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod gateway;

pub use error::{BiometricFailure, Result, WalletError};

pub use client::{ClientConfig, GatewayClient};
