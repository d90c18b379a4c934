/*
[INPUT]:  Access/refresh tokens and expires-in durations
[OUTPUT]: Token retrieval and expiration status
[POS]:    Auth layer - token lifecycle management
[UPDATE]: When changing the refresh margin or token record format
*/

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::Secret;

/// Tokens are treated as expired this long before their real expiry
pub const EARLY_REFRESH_MARGIN_MS: i64 = 300_000;

/// Token material returned by login or refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    pub access_token: Secret,
    pub refresh_token: Option<Secret>,
    /// Lifetime of the access token in seconds
    pub expires_in: u64,
}

/// Access token paired with its expiry; one never exists without the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct AccessGrant {
    token: Secret,
    expires_at: DateTime<Utc>,
}

/// Mutable token state owned by a wallet session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
    access: Option<AccessGrant>,
    refresh_token: Option<Secret>,
}

impl TokenState {
    /// Create an empty token state
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from already-known values, e.g. a host-side cache
    pub fn from_parts(
        access_token: Secret,
        expires_at: DateTime<Utc>,
        refresh_token: Option<Secret>,
    ) -> Self {
        Self {
            access: Some(AccessGrant {
                token: access_token,
                expires_at,
            }),
            refresh_token,
        }
    }

    pub fn access_token(&self) -> Option<&Secret> {
        self.access.as_ref().map(|grant| &grant.token)
    }

    pub fn refresh_token(&self) -> Option<&Secret> {
        self.refresh_token.as_ref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.access.as_ref().map(|grant| grant.expires_at)
    }

    /// Check if the access token is missing or inside the early-refresh margin
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.access.as_ref() {
            Some(grant) => now >= grant.expires_at - Duration::milliseconds(EARLY_REFRESH_MARGIN_MS),
            None => true,
        }
    }

    /// Store tokens from a login or refresh result.
    ///
    /// A result without a refresh token keeps the current one.
    pub fn set_from_auth_result(&mut self, result: &AuthResult) {
        self.set_from_auth_result_at(result, Utc::now());
    }

    pub fn set_from_auth_result_at(&mut self, result: &AuthResult, now: DateTime<Utc>) {
        let lifetime_ms = i64::try_from(result.expires_in.saturating_mul(1000)).unwrap_or(i64::MAX);
        let expires_at = now
            .checked_add_signed(Duration::milliseconds(lifetime_ms))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.access = Some(AccessGrant {
            token: result.access_token.clone(),
            expires_at,
        });
        if let Some(refresh_token) = result.refresh_token.as_ref() {
            self.refresh_token = Some(refresh_token.clone());
        }
    }

    /// Drop all token material
    pub fn clear(&mut self) {
        self.access = None;
        self.refresh_token = None;
    }
}
