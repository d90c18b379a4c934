/*
[INPUT]:  OAuth configuration, callback URLs, tokens and host capabilities
[OUTPUT]: Wallet sessions with managed token lifecycles
[POS]:    Auth layer - login flow, token state and authenticated operations
[UPDATE]: When auth flow, token rules or capability traits change
*/

pub mod biometric;
pub mod oauth;
pub mod secret;
pub mod session;
pub mod store;
pub mod token;

pub use biometric::{BiometricGate, BiometricOutcome, MockBiometricGate};
pub use oauth::{
    BrowserResult, BrowserSession, LoginAttempt, LoginState, OAuthClient, OAuthConfig,
    parse_callback_url,
};
pub use secret::Secret;
pub use session::{SessionConfig, SessionIdentity, WalletSession};
pub use store::{FileTokenStore, MemoryTokenStore, TOKEN_RECORD_NAME, TokenStore};
pub use token::{AuthResult, EARLY_REFRESH_MARGIN_MS, TokenState};
