/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public wallet session adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{
    AuthResult,
    BiometricGate,
    BiometricOutcome,
    BrowserResult,
    BrowserSession,
    FileTokenStore,
    LoginAttempt,
    LoginState,
    MemoryTokenStore,
    MockBiometricGate,
    OAuthClient,
    OAuthConfig,
    Secret,
    SessionConfig,
    SessionIdentity,
    TokenState,
    TokenStore,
    WalletSession,
    parse_callback_url,
};

// Re-export commonly used types from http
pub use http::{
    BiometricFailure,
    ClientConfig,
    GatewayClient,
    Result,
    WalletError,
};

// Re-export all types
pub use types::*;
