/*
[INPUT]:  Error sources (transport, HTTP status, JSON, auth, biometrics, OAuth callback)
[OUTPUT]: Structured error types whose Display is the normalized `{error}` message
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or changing user-facing messages
*/

use reqwest::StatusCode;
use thiserror::Error;

use crate::auth::Secret;

/// Why a biometric gate refused to let an operation through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiometricFailure {
    /// No hardware, or hardware present but nothing enrolled
    Unavailable,
    /// The prompt was shown and the user failed or cancelled it
    Rejected,
}

impl std::fmt::Display for BiometricFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BiometricFailure::Unavailable => f.write_str("No biometric authentication available"),
            BiometricFailure::Rejected => f.write_str("Biometric authentication required."),
        }
    }
}

/// Main error type for the wallet session adapter
#[derive(Error, Debug)]
pub enum WalletError {
    /// Transport failure (DNS, TLS, connect, timeout)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("{status} {body}")]
    Http { status: u16, body: String },

    /// Malformed JSON or a missing expected field
    #[error("decode error: {0}")]
    Decode(String),

    /// No valid access token and refreshing it failed
    #[error("Authentication required. Please login again.")]
    AuthRequired,

    /// Biometric gate refused the operation
    #[error("{0}")]
    BiometricDenied(BiometricFailure),

    /// User closed the browser session
    #[error("Authentication cancelled")]
    UserCancelled,

    /// Callback URL did not carry a usable `user_data` payload.
    ///
    /// `raw` keeps the undecodable payload for diagnostics; it never reaches Display.
    #[error("{reason}")]
    CallbackMalformed { reason: String, raw: Option<Secret> },

    /// Browser session ended in an unexpected way
    #[error("Authentication failed")]
    AuthFailed,

    /// Failure of a named operation, as returned to callers
    #[error("{context}: {source}")]
    Operation {
        context: &'static str,
        #[source]
        source: Box<WalletError>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Token store read/write failed
    #[error("Token storage error: {0}")]
    Storage(String),
}

impl WalletError {
    /// Wrap an error with the operation that produced it
    pub fn in_operation(self, context: &'static str) -> Self {
        WalletError::Operation {
            context,
            source: Box::new(self),
        }
    }

    /// Create an HTTP failure from status code and body text
    pub fn http(status: StatusCode, body: impl Into<String>) -> Self {
        WalletError::Http {
            status: status.as_u16(),
            body: body.into(),
        }
    }

    /// Innermost error, skipping operation wrappers
    pub fn root(&self) -> &WalletError {
        match self {
            WalletError::Operation { source, .. } => source.root(),
            other => other,
        }
    }

    /// HTTP status of the underlying failure, if any
    pub fn status(&self) -> Option<u16> {
        match self.root() {
            WalletError::Http { status, .. } => Some(*status),
            WalletError::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if the error is a transient transport failure.
    ///
    /// Nothing in this crate retries on it; hosts may.
    pub fn is_retryable(&self) -> bool {
        matches!(self.root(), WalletError::Network(_))
    }

    /// Check if error indicates the user must authenticate again
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self.root(),
            WalletError::AuthRequired
                | WalletError::Http { status: 401, .. }
                | WalletError::BiometricDenied(_)
        )
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        WalletError::Decode(err.to_string())
    }
}

/// Result type alias for wallet session operations
pub type Result<T> = std::result::Result<T, WalletError>;
